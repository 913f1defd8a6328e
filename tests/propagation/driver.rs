use super::{GEOSYNC, VANGUARD_1};
use brouwer::time::Unit;
use brouwer::{Elements, GravityModelKind, PropagationError, Sgp4, TimeTagged};

fn vanguard() -> Sgp4 {
    Sgp4::with_model(
        Elements::from_lines(VANGUARD_1.0, VANGUARD_1.1).unwrap(),
        GravityModelKind::Wgs72,
    )
}

/// Propagating to an absolute epoch must be the minutes-since-epoch propagation, exactly.
#[test]
fn absolute_epoch_matches_relative_time() {
    let prop = vanguard();
    let epoch = prop.elements().epoch() + Unit::Minute * 360.0;

    let absolute = prop.propagate(epoch).unwrap();
    let relative = prop.propagate_tsince(360.0).unwrap();
    assert_eq!(absolute, relative);
    assert_eq!(absolute.epoch(), epoch);

    let for_form = prop.propagate_for(Unit::Minute * 360.0).unwrap();
    assert_eq!(for_form, relative);
}

/// The parallel batch must preserve order and return bit-identical states to sequential calls.
#[test]
fn batch_matches_sequential() {
    let prop = vanguard();
    let elset_epoch = prop.elements().epoch();
    let epochs: Vec<_> = (-2..10)
        .map(|hours| elset_epoch + Unit::Hour * f64::from(hours))
        .collect();

    let batch = prop.propagate_many(&epochs).unwrap();
    assert_eq!(batch.len(), epochs.len());
    for (epoch, state) in epochs.iter().zip(&batch) {
        assert_eq!(*state, prop.propagate(*epoch).unwrap());
    }
}

/// The record is initialized exactly once and shared across calls.
#[test]
fn record_is_initialized_once() {
    let prop = Sgp4::with_model(
        Elements::from_lines(GEOSYNC.0, GEOSYNC.1).unwrap(),
        GravityModelKind::Wgs72,
    );
    let first = prop.record().unwrap() as *const _;
    let _ = prop.propagate_tsince(360.0).unwrap();
    let second = prop.record().unwrap() as *const _;
    assert!(std::ptr::eq(first, second));
}

/// Parser failures surface through the driver as typed propagation errors.
#[test]
fn parse_failures_are_wrapped() {
    let err = Sgp4::from_lines("not an element set", VANGUARD_1.1).unwrap_err();
    assert!(matches!(err, PropagationError::Parse { .. }), "{err}");
}

/// The gravity model knob resolves by name, and unknown names are typed failures.
#[test]
fn gravity_model_by_name() {
    let elements = Elements::from_lines(VANGUARD_1.0, VANGUARD_1.1).unwrap();
    let prop = Sgp4::with_model_name(elements.clone(), "wgs72").unwrap();
    assert_eq!(prop.gravity().kind, GravityModelKind::Wgs72);

    let err = Sgp4::with_model_name(elements, "jgm3").unwrap_err();
    assert!(matches!(err, PropagationError::Gravity { .. }), "{err}");
}

/// Three line sets keep their name through the driver.
#[test]
fn named_elements_round_trip() {
    let prop = Sgp4::from_three_lines("0 VANGUARD 1", VANGUARD_1.0, VANGUARD_1.1).unwrap();
    assert_eq!(prop.elements().name.as_deref(), Some("VANGUARD 1"));
    assert_eq!(prop.elements().norad_id, 5);

    // The default model is the newer constant set
    assert_eq!(prop.gravity().kind, GravityModelKind::Wgs84);
}

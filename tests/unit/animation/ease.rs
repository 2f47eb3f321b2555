use super::*;

const ALL: [Ease; 9] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InBounce,
    Ease::OutBounce,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
    }
}

#[test]
fn input_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn out_bounce_touches_target_then_rebounds() {
    let first_contact = Ease::OutBounce.apply(1.0 / 2.75);
    assert!((first_contact - 1.0).abs() < 1e-9);
    assert!(Ease::OutBounce.apply(0.5) < 1.0);
    assert!(Ease::OutBounce.apply(0.5) > 0.7);
}

#[test]
fn in_cubic_starts_slow() {
    assert!(Ease::InCubic.apply(0.5) < Ease::Linear.apply(0.5));
    assert_eq!(Ease::InCubic.apply(0.5), 0.125);
}

#[test]
fn serializes_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&Ease::OutBounce).unwrap(),
        "\"out_bounce\""
    );
    let e: Ease = serde_json::from_str("\"in_cubic\"").unwrap();
    assert_eq!(e, Ease::InCubic);
}

// Integration tests for the switch profile table.

use thock_core::*;

#[test]
fn builtin_table_has_five_named_profiles() {
    let table = ProfileTable::builtin();
    assert!(table.len() >= 5);
    for id in ["red", "blue", "brown", "black", "speed"] {
        assert!(table.contains(id), "missing profile '{id}'");
    }
    assert_eq!(table.ids(), vec!["black", "blue", "brown", "red", "speed"]);
}

#[test]
fn every_builtin_profile_is_within_domain() {
    for (id, profile) in BUILTIN_PROFILES {
        assert_eq!(profile.validate(), Ok(()), "profile '{id}' out of domain");
    }
}

#[test]
fn lookup_is_total_and_falls_back_to_red() {
    let table = ProfileTable::builtin();
    for id in ["", "purple", "RED", " red", "blue\n", "🎹", "speed-silver"] {
        let p = table.lookup(id);
        assert_eq!(p, RED, "unexpected profile for {id:?}");
        assert!(p.validate().is_ok());
    }
}

#[test]
fn lookup_returns_the_named_profile() {
    let table = ProfileTable::builtin();
    assert_eq!(table.lookup("blue").click_frequency, 4200.0);
    assert_eq!(table.lookup("red").click_frequency, 0.0);
    let brown = table.lookup("brown");
    assert_eq!(brown.filter_center_frequency, 1000.0);
    assert_eq!(brown.click_frequency, 2200.0);
    assert_eq!(brown.body_frequency, 200.0);
    assert!((brown.body_decay_time - 0.07).abs() < 1e-6);
    assert!((brown.click_decay_time - 0.015).abs() < 1e-6);
    let speed = table.lookup("speed");
    assert_eq!(speed.filter_center_frequency, 1200.0);
    assert!(!speed.has_click());
}

#[test]
fn mutating_a_lookup_result_does_not_touch_the_table() {
    let table = ProfileTable::builtin();
    let mut p = table.lookup("blue");
    p.master_volume = 0.01;
    p.click_frequency = 0.0;
    assert_eq!(table.lookup("blue"), BLUE);
}

#[test]
fn validate_rejects_out_of_domain_fields() {
    let mut p = RED;
    p.body_frequency = 0.0;
    assert!(matches!(
        p.validate(),
        Err(ProfileError::NotPositive { field: "body_frequency", .. })
    ));

    let mut p = RED;
    p.master_volume = 1.5;
    assert_eq!(p.validate(), Err(ProfileError::VolumeOutOfRange(1.5)));

    let mut p = RED;
    p.click_frequency = -1.0;
    assert!(matches!(p.validate(), Err(ProfileError::Negative { .. })));

    let mut p = RED;
    p.click_frequency = 3000.0;
    assert_eq!(p.validate(), Err(ProfileError::MissingClickDecay(0.0)));

    let mut p = BROWN;
    p.filter_resonance = f32::NAN;
    assert!(p.validate().is_err());
}

// Tests for tuning constants and their relationships.

use thock_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn release_is_always_lighter_than_press() {
    assert!(RELEASE_BODY_GAIN < 1.0);
    assert!(RELEASE_CLICK_GAIN < CLICK_GAIN);
    assert!(RELEASE_DECAY_SCALE < 1.0);
    assert!(RELEASE_CLICK_DECAY_SCALE < 1.0);
    // release sits higher in the spectrum
    assert!(RELEASE_FILTER_SHIFT > 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn ramps_and_pads_are_positive() {
    assert!(RAMP_FLOOR > 0.0 && RAMP_FLOOR < 0.01);
    assert!(NOISE_STOP_PAD_SEC > 0.0);
    assert!(CLICK_STOP_PAD_SEC > 0.0);
    assert!(THUD_STOP_SEC > THUD_DECAY_SEC);
    assert!(CLICK_JITTER > DEFAULT_JITTER);
}

#[test]
fn every_stroke_lives_under_a_quarter_second() {
    for (id, p) in BUILTIN_PROFILES {
        let body_end = p.body_decay_time as f64 + NOISE_STOP_PAD_SEC;
        let click_end = p.click_decay_time as f64 + CLICK_STOP_PAD_SEC;
        let longest = body_end.max(click_end).max(THUD_STOP_SEC);
        assert!(longest < 0.25, "'{id}' rings for {longest} s");
    }
}

#[test]
fn default_switch_is_a_builtin_profile() {
    assert!(ProfileTable::builtin().contains(DEFAULT_SWITCH_ID));
}

// Integration tests for press/release graph assembly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thock_core::*;

fn noise() -> NoiseBuffer {
    NoiseBuffer::generate(48_000.0, &mut StdRng::seed_from_u64(11))
}

fn within(value: f64, center: f64, amount: f64) -> bool {
    let eps = center * 1e-5;
    value >= center * (1.0 - amount) - eps && value <= center * (1.0 + amount) + eps
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn blue_press_has_click_and_red_press_does_not() {
    let table = ProfileTable::builtin();
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(1);
    let blue = key_down(&table.lookup("blue"), "blue", 0.0, Some(&noise), &mut rng);
    assert!(blue.has_click());
    let click = blue.layer(LayerKind::Click).expect("click layer");
    assert!(within(click.frequency_hz().unwrap_or(0.0) as f64, 4200.0, 0.06));
    assert!(matches!(
        click.source,
        Source::Oscillator {
            waveform: Waveform::Square,
            ..
        }
    ));

    let red = key_down(&table.lookup("red"), "red", 0.0, Some(&noise), &mut rng);
    assert!(!red.has_click());
    assert!(red.has_thud());
    assert!(red.has_noise_body());
}

#[test]
fn brown_press_matches_profile_parameters() {
    let table = ProfileTable::builtin();
    let brown = table.lookup("brown");
    let noise = noise();
    let now = 12.5;
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = key_down(&brown, "brown", now, Some(&noise), &mut rng);
        assert_eq!(g.stroke, Stroke::Down);
        assert_eq!(g.layers.len(), 3);

        let body = g.layer(LayerKind::NoiseBody).expect("noise body");
        let filter = body.filter.expect("bandpass");
        assert!(within(filter.center_hz as f64, 1000.0, 0.04), "center {}", filter.center_hz);
        assert_eq!(filter.q, brown.filter_resonance);
        assert!(close(body.decay_sec(), 0.07));
        assert!(within(body.envelope.peak as f64, brown.master_volume as f64, 0.04));
        assert!(body.stop_time > body.envelope.end_time);
        assert!(body.stop_time - body.envelope.end_time <= 0.05);

        let click = g.layer(LayerKind::Click).expect("click");
        assert!(within(click.frequency_hz().unwrap_or(0.0) as f64, 2200.0, 0.06));
        assert!(close(click.decay_sec(), 0.015));
        assert!((click.envelope.peak - brown.master_volume * 0.25).abs() < 1e-6);
        assert!(click.stop_time > click.envelope.end_time);

        let thud = g.layer(LayerKind::Thud).expect("thud");
        assert!(within(thud.frequency_hz().unwrap_or(0.0) as f64, 200.0, 0.04));
        assert!(close(thud.decay_sec(), 0.04));
        assert!((thud.envelope.peak - brown.master_volume * 0.45).abs() < 1e-6);
        assert!(matches!(
            thud.source,
            Source::Oscillator {
                waveform: Waveform::Sine,
                ..
            }
        ));

        for layer in &g.layers {
            assert_eq!(layer.start_time, now);
            assert_eq!(layer.envelope.start_time, now);
            assert!(layer.envelope.floor > 0.0);
            assert!(layer.stop_time - now < 0.2);
        }
        assert_eq!(g.start_time(), Some(now));
    }
}

#[test]
fn speed_release_has_no_click_or_thud() {
    let table = ProfileTable::builtin();
    let speed = table.lookup("speed");
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(4);
    let g = key_up(&speed, "speed", 3.0, Some(&noise), &mut rng);
    assert_eq!(g.stroke, Stroke::Up);
    assert!(!g.has_click());
    assert!(!g.has_thud());
    let body = g.layer(LayerKind::NoiseBody).expect("noise body");
    let filter = body.filter.expect("bandpass");
    assert!(within(filter.center_hz as f64, 1680.0, 0.04), "center {}", filter.center_hz);
    assert!((filter.q - speed.filter_resonance * 0.8).abs() < 1e-6);
    assert!((body.decay_sec() - 0.021).abs() < 1e-6);
    // release body gain is fixed, not jittered
    assert_eq!(body.envelope.peak, speed.master_volume * 0.35);
}

#[test]
fn release_never_has_a_thud() {
    let table = ProfileTable::builtin();
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(9);
    for id in table.ids().into_iter().chain(["", "unknown"]) {
        let g = key_up(&table.lookup(id), id, 0.0, Some(&noise), &mut rng);
        assert!(!g.has_thud(), "release for '{id}' scheduled a thud");
        let g = key_up(&table.lookup(id), id, 0.0, None, &mut rng);
        assert!(!g.has_thud());
    }
}

#[test]
fn blue_release_click_is_lower_softer_and_shorter() {
    let blue = BLUE;
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(21);
    let up = key_up(&blue, "blue", 0.0, Some(&noise), &mut rng);
    let click = up.layer(LayerKind::Click).expect("click");
    assert!(within(click.frequency_hz().unwrap_or(0.0) as f64, 4200.0 * 0.8, 0.06));
    assert!((click.envelope.peak - blue.master_volume * 0.15).abs() < 1e-6);
    assert!(close(click.decay_sec(), (blue.click_decay_time * 0.7) as f64));

    let down = key_down(&blue, "blue", 0.0, Some(&noise), &mut rng);
    let press_click = down.layer(LayerKind::Click).expect("click");
    assert!(click.envelope.peak < press_click.envelope.peak);
    assert!(click.decay_sec() < press_click.decay_sec());
}

#[test]
fn missing_noise_buffer_skips_only_the_body() {
    let mut rng = StdRng::seed_from_u64(2);
    let g = key_down(&BLUE, "blue", 1.0, None, &mut rng);
    assert!(!g.has_noise_body());
    assert!(g.has_thud());
    assert!(g.has_click());

    let g = key_up(&RED, "red", 1.0, None, &mut rng);
    assert!(g.is_empty());
    assert_eq!(g.end_time(), None);
}

#[test]
fn noise_layers_share_the_given_buffer() {
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(6);
    for g in [
        key_down(&BLACK, "black", 0.0, Some(&noise), &mut rng),
        key_up(&BLACK, "black", 0.0, Some(&noise), &mut rng),
    ] {
        match &g.layer(LayerKind::NoiseBody).expect("noise body").source {
            Source::Noise(buf) => assert!(buf.same_buffer(&noise)),
            other => panic!("unexpected source {other:?}"),
        }
    }
}

#[test]
fn every_envelope_is_a_valid_exponential_ramp() {
    // peak at start_time, then a strictly later ramp to a positive floor
    let table = ProfileTable::builtin();
    let noise = noise();
    let mut rng = StdRng::seed_from_u64(8);
    for id in table.ids() {
        let profile = table.lookup(id);
        for g in [
            key_down(&profile, id, 2.5, Some(&noise), &mut rng),
            key_up(&profile, id, 2.5, Some(&noise), &mut rng),
        ] {
            for layer in &g.layers {
                let env = layer.envelope;
                assert!(env.floor > 0.0, "{id} {:?}", layer.kind);
                assert!(env.peak >= env.floor, "{id} {:?}", layer.kind);
                assert!(env.end_time > env.start_time, "{id} {:?}", layer.kind);
                assert!(close(env.gain_at(env.start_time) as f64, env.peak as f64));
            }
        }
    }
}

// Integration tests for the shared noise-body buffer.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thock_core::*;

#[test]
fn length_is_a_tenth_of_a_second_at_native_rate() {
    let mut rng = StdRng::seed_from_u64(1);
    for sr in [8_000.0_f32, 22_050.0, 44_100.0, 48_000.0, 96_000.0, 44_100.5] {
        let buf = NoiseBuffer::generate(sr, &mut rng);
        let expected = (sr as f64 * 0.1).round() as usize;
        assert_eq!(buf.len(), expected, "sample rate {sr}");
        assert_eq!(buf.sample_rate(), sr);
        assert!((buf.duration_sec() - 0.1).abs() < 1.0 / sr as f64);
    }
}

#[test]
fn samples_are_bounded_and_front_loaded() {
    let mut rng = StdRng::seed_from_u64(5);
    let buf = NoiseBuffer::generate(48_000.0, &mut rng);
    assert!(buf.samples().iter().all(|s| s.abs() <= 1.0));
    let n = buf.len();
    let energy = |range: std::ops::Range<usize>| -> f32 {
        buf.samples()[range].iter().map(|s| s * s).sum()
    };
    let head = energy(0..n / 4);
    let tail = energy(3 * n / 4..n);
    assert!(head > tail * 20.0, "head {head} tail {tail}");
    // exp(-4) at the very end
    assert!(buf.samples()[n - 1].abs() <= noise_envelope(n - 1, n) + 1e-6);
    assert!(noise_envelope(n - 1, n) < 0.02);
}

#[test]
fn envelope_starts_at_unity_and_strictly_decreases() {
    let n = noise_len(44_100.0);
    assert_eq!(noise_envelope(0, n), 1.0);
    let mut prev = noise_envelope(0, n);
    for i in 1..n {
        let e = noise_envelope(i, n);
        assert!(e < prev, "envelope not decreasing at {i}");
        assert!(e > 0.0);
        prev = e;
    }
}

#[test]
fn clones_share_samples() {
    let mut rng = StdRng::seed_from_u64(8);
    let a = NoiseBuffer::generate(48_000.0, &mut rng);
    let b = a.clone();
    assert!(a.same_buffer(&b));
    let c = NoiseBuffer::generate(48_000.0, &mut rng);
    assert!(!a.same_buffer(&c));
}

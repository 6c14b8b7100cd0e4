use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thock_core::{DeviceState, KeySynth, OfflineBackend, ProfileTable};

mod audio;

use audio::CpalBackend;

#[derive(Parser)]
#[command(name = "thock", version, about = "Procedural mechanical keyboard sounds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type lines on stdin; every character plays a press and a release
    Play {
        #[arg(short, long, default_value = "brown")]
        switch: String,
        /// Time between press and release
        #[arg(long, default_value_t = 60)]
        hold_ms: u64,
        /// Pause after each release
        #[arg(long, default_value_t = 40)]
        gap_ms: u64,
    },
    /// Render keystrokes to a mono 16-bit WAV without opening the sound card
    Render {
        #[arg(short, long, default_value = "brown")]
        switch: String,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(
            long,
            default_value_t = 48_000,
            value_parser = clap::value_parser!(u32).range(8_000..=192_000)
        )]
        sample_rate: u32,
        #[arg(long, default_value_t = 8)]
        strokes: usize,
        #[arg(long, default_value_t = 60)]
        hold_ms: u64,
        #[arg(long, default_value_t = 140)]
        interval_ms: u64,
        /// Fixed seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the built-in switch profiles
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            switch,
            hold_ms,
            gap_ms,
        } => play(&switch, hold_ms, gap_ms),
        Command::Render {
            switch,
            out,
            sample_rate,
            strokes,
            hold_ms,
            interval_ms,
            seed,
        } => render(
            &switch,
            &out,
            sample_rate,
            strokes,
            hold_ms,
            interval_ms,
            seed,
        ),
        Command::List => {
            list();
            Ok(())
        }
    }
}

fn warn_unknown(switch: &str) {
    if !ProfileTable::builtin().contains(switch) {
        log::warn!("unknown switch '{}', using the default profile", switch);
    }
}

fn play(switch: &str, hold_ms: u64, gap_ms: u64) -> anyhow::Result<()> {
    warn_unknown(switch);
    let mut synth = KeySynth::new(CpalBackend::default());
    if synth.ensure_device().is_none() {
        anyhow::bail!("no audio output available");
    }
    log::info!("type and press enter ({} switches, ctrl-d to quit)", switch);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        for _ in line.chars() {
            synth.play_down(switch);
            thread::sleep(Duration::from_millis(hold_ms));
            synth.play_up(switch);
            thread::sleep(Duration::from_millis(gap_ms));
        }
        if synth.device().state() == DeviceState::Unavailable {
            anyhow::bail!("audio output went away");
        }
    }
    Ok(())
}

fn render(
    switch: &str,
    out: &Path,
    sample_rate: u32,
    strokes: usize,
    hold_ms: u64,
    interval_ms: u64,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    warn_unknown(switch);
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut synth = KeySynth::with_rng(OfflineBackend::new(sample_rate as f32), rng);
    let frames = |ms: u64| (sample_rate as u64 * ms / 1000) as usize;
    let hold = frames(hold_ms);
    let rest = frames(interval_ms.saturating_sub(hold_ms));

    let mut samples: Vec<f32> = Vec::new();
    for _ in 0..strokes {
        synth.play_down(switch);
        samples.extend(synth.backend().render(hold));
        synth.play_up(switch);
        samples.extend(synth.backend().render(rest));
    }
    // let the last release ring out
    samples.extend(synth.backend().render(frames(200)));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(out, spec)
        .with_context(|| format!("creating {}", out.display()))?;
    for s in &samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    log::info!(
        "wrote {} strokes ({:.2} s) to {}",
        strokes,
        samples.len() as f64 / sample_rate as f64,
        out.display()
    );
    Ok(())
}

fn list() {
    let table = ProfileTable::builtin();
    for id in table.ids() {
        let p = table.lookup(id);
        let click = if p.has_click() {
            format!("{:.0} Hz / {:.0} ms", p.click_frequency, p.click_decay_time * 1000.0)
        } else {
            "none".to_owned()
        };
        println!(
            "{:<6} body {:>4.0} Hz  filter {:>5.0} Hz q{:.1}  decay {:>3.0} ms  click {:<16} vol {:.2}",
            id,
            p.body_frequency,
            p.filter_center_frequency,
            p.filter_resonance,
            p.body_decay_time * 1000.0,
            click,
            p.master_volume
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("thock").chain(args.iter().copied()))
    }

    #[test]
    fn render_rejects_out_of_range_sample_rates() {
        for rate in ["0", "7999", "192001"] {
            assert!(
                parse(&["render", "--out", "keys.wav", "--sample-rate", rate]).is_err(),
                "{rate}"
            );
        }
    }

    #[test]
    fn render_accepts_common_sample_rates() {
        for rate in [8_000u32, 44_100, 48_000, 192_000] {
            let arg = rate.to_string();
            let cli = parse(&["render", "--out", "keys.wav", "--sample-rate", arg.as_str()])
                .expect("valid rate");
            match cli.command {
                Command::Render { sample_rate, .. } => assert_eq!(sample_rate, rate),
                _ => panic!("expected render"),
            }
        }
    }
}

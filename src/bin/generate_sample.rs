use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use facs_smooth::data::model::{EYE_LANDMARK_POINTS, LANDMARK_POINTS, NON_RIGID_PARAMS};
use facs_smooth::{ChannelKind, DatasetKind};

/// Write a synthetic tracker CSV with every column the datasets read.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV path
    #[arg(short, long, default_value = "sample_tracking.csv")]
    output: PathBuf,

    /// Number of frames
    #[arg(short, long, default_value = "300")]
    frames: usize,

    /// Frames per second for the timestamp column
    #[arg(long, default_value = "30")]
    fps: f64,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// A slow oscillation with per-channel period and phase plus sensor jitter.
struct Wave {
    amplitude: f64,
    offset: f64,
    period: f64,
    phase: f64,
    noise: f64,
}

impl Wave {
    fn random(rng: &mut SimpleRng, amplitude: f64, offset: f64, noise: f64) -> Self {
        Wave {
            amplitude,
            offset,
            period: 40.0 + rng.next_f64() * 80.0,
            phase: rng.next_f64() * 2.0 * PI,
            noise,
        }
    }

    fn sample(&self, frame: usize, rng: &mut SimpleRng) -> f64 {
        let t = frame as f64 / self.period * 2.0 * PI + self.phase;
        self.offset + self.amplitude * t.sin() + rng.gauss(0.0, self.noise)
    }
}

fn grid(prefixes: &[&str], count: usize) -> Vec<String> {
    prefixes
        .iter()
        .flat_map(|p| (0..count).map(move |i| format!("{p}{i}")))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut channels: Vec<(String, Wave)> = Vec::new();
    let action_units = DatasetKind::Facs
        .vocabulary()
        .into_iter()
        .filter(|(_, kind)| *kind == ChannelKind::ActionUnit);
    for (au, _) in action_units {
        let amplitude = 0.5 + rng.next_f64() * 2.0;
        channels.push((au, Wave::random(&mut rng, amplitude, amplitude, 0.08)));
    }
    for name in ["gaze_angle_x", "gaze_angle_y"] {
        channels.push((name.to_string(), Wave::random(&mut rng, 0.3, 0.0, 0.02)));
    }
    for name in grid(&["eye_lmk_x_", "eye_lmk_y_"], EYE_LANDMARK_POINTS) {
        let offset = 250.0 + rng.next_f64() * 100.0;
        channels.push((name, Wave::random(&mut rng, 2.0, offset, 0.3)));
    }
    for name in grid(&["eye_lmk_X_", "eye_lmk_Y_", "eye_lmk_Z_"], EYE_LANDMARK_POINTS) {
        let offset = -30.0 + rng.next_f64() * 60.0;
        channels.push((name, Wave::random(&mut rng, 1.0, offset, 0.2)));
    }
    for name in ["pose_Tx", "pose_Ty", "pose_Tz"] {
        channels.push((name.to_string(), Wave::random(&mut rng, 10.0, 400.0, 1.0)));
    }
    for name in ["pose_Rx", "pose_Ry", "pose_Rz"] {
        channels.push((name.to_string(), Wave::random(&mut rng, 0.2, 0.0, 0.03)));
    }
    for name in grid(&["x_", "y_"], LANDMARK_POINTS) {
        let offset = 200.0 + rng.next_f64() * 200.0;
        channels.push((name, Wave::random(&mut rng, 3.0, offset, 0.5)));
    }
    for name in grid(&["X_", "Y_", "Z_"], LANDMARK_POINTS) {
        let offset = -60.0 + rng.next_f64() * 120.0;
        channels.push((name, Wave::random(&mut rng, 2.0, offset, 0.4)));
    }
    channels.push(("p_scale".to_string(), Wave::random(&mut rng, 0.05, 1.2, 0.005)));
    for name in ["p_rx", "p_ry", "p_rz"] {
        channels.push((name.to_string(), Wave::random(&mut rng, 0.2, 0.0, 0.02)));
    }
    for name in ["p_tx", "p_ty"] {
        channels.push((name.to_string(), Wave::random(&mut rng, 8.0, 300.0, 0.8)));
    }
    for name in grid(&["p_"], NON_RIGID_PARAMS) {
        channels.push((name, Wave::random(&mut rng, 5.0, 0.0, 0.5)));
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut header = vec![
        "frame".to_string(),
        "face_id".to_string(),
        "timestamp".to_string(),
        "confidence".to_string(),
        "success".to_string(),
    ];
    header.extend(channels.iter().map(|(name, _)| name.clone()));
    writer.write_record(&header)?;

    let mut low_confidence = 0;
    for frame in 0..args.frames {
        // Occasional tracking dropouts.
        let confidence = if rng.next_f64() < 0.05 {
            low_confidence += 1;
            0.3 + rng.next_f64() * 0.35
        } else {
            0.85 + rng.next_f64() * 0.13
        };

        let mut record = vec![
            (frame + 1).to_string(),
            "0".to_string(),
            format!("{:.3}", frame as f64 / args.fps),
            format!("{confidence:.2}"),
            "1".to_string(),
        ];
        record.extend(
            channels
                .iter()
                .map(|(_, wave)| format!("{:.4}", wave.sample(frame, &mut rng))),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} frames ({} columns, {low_confidence} low-confidence) to {}",
        args.frames,
        header.len(),
        args.output.display()
    );
    Ok(())
}

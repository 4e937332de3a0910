use std::path::{Path, PathBuf};

use anyhow::Result;
use rusty_spectra::data::export::write_grid;
use rusty_spectra::data::model::{Grid, Layout};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Gaussian band (nm) whose amplitude decays exponentially in time.
struct Band {
    centre: f64,
    width: f64,
    amplitude: f64,
    lifetime: f64,
}

fn generate_grid(
    wavelengths: &[f64],
    times: &[f64],
    bands: &[Band],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Grid {
    let z = times
        .iter()
        .map(|&t| {
            wavelengths
                .iter()
                .map(|&wl| {
                    let signal: f64 = bands
                        .iter()
                        .map(|b| {
                            gaussian(wl, b.centre, b.width, b.amplitude) * (-t / b.lifetime).exp()
                        })
                        .sum();
                    signal + rng.gauss(0.0, noise_level)
                })
                .collect()
        })
        .collect();
    Grid {
        z,
        wavelengths: wavelengths.to_vec(),
        times: times.to_vec(),
        wavelength_labels: None,
    }
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(42);

    // Wavelengths: 400 → 700 nm, step 2
    let wavelengths: Vec<f64> = (0..151).map(|i| 400.0 + i as f64 * 2.0).collect();
    // Times: logarithmically spaced 0.1 → 1000 ps, plus time zero
    let times: Vec<f64> = std::iter::once(0.0)
        .chain((0..40).map(|i| 10f64.powf(-1.0 + i as f64 * 0.1)))
        .collect();

    let bands = [
        Band { centre: 480.0, width: 20.0, amplitude: 1.0, lifetime: 5.0 },
        Band { centre: 560.0, width: 35.0, amplitude: -0.6, lifetime: 80.0 },
        Band { centre: 640.0, width: 15.0, amplitude: 0.4, lifetime: 400.0 },
    ];
    let grid = generate_grid(&wavelengths, &times, &bands, 0.01, &mut rng);

    let outputs: [(&str, Layout); 3] = [
        ("sample_time_major.txt", Layout::TimeMajor),
        ("sample_time_major.csv", Layout::TimeMajor),
        ("sample_wavelength_major.csv", Layout::WavelengthMajor),
    ];
    for (name, layout) in outputs {
        let path = out_dir.join(name);
        write_grid(&path, &grid, layout)?;
        report(&path, &grid);
    }
    Ok(())
}

fn report(path: &Path, grid: &Grid) {
    println!(
        "Wrote {} ({} wavelengths x {} times)",
        path.display(),
        grid.wavelengths.len(),
        grid.times.len()
    );
}

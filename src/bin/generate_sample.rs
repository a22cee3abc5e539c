//! Writes a synthetic accident register in the published layout:
//! `;`-separated, CRLF line endings, ETRS-GK25 coordinates (north, east).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Generate a synthetic Helsinki accident register")]
struct Args {
    /// Output file.
    #[arg(long, default_value = "data/liikenneonnettomuudet_Helsingissa.csv")]
    output: PathBuf,

    /// Number of accident rows per year.
    #[arg(long, default_value_t = 120)]
    rows_per_year: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Busy spots around the city, as (north, east, spread in metres).
const HOTSPOTS: [(f64, f64, f64); 6] = [
    (6_672_900.0, 25_497_300.0, 600.0),  // city centre
    (6_675_500.0, 25_497_000.0, 900.0),  // Pasila
    (6_679_200.0, 25_500_400.0, 1_200.0), // Malmi road
    (6_673_800.0, 25_505_800.0, 1_000.0), // Itäväylä
    (6_677_000.0, 25_490_300.0, 1_100.0), // Huopalahti
    (6_681_900.0, 25_505_500.0, 1_500.0), // Malmi
];

/// Kind codes with relative frequency.
const KINDS: [(&str, f64); 4] = [("MA", 0.62), ("PP", 0.16), ("JK", 0.14), ("MP", 0.08)];

/// Seriousness codes with relative frequency.
const SERIOUSNESS: [(u8, f64); 3] = [(1, 0.70), (2, 0.29), (3, 0.01)];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn pick<'a, T>(&mut self, weighted: &'a [(T, f64)]) -> &'a T {
        let mut r = self.next_f64() * weighted.iter().map(|(_, w)| w).sum::<f64>();
        for (value, weight) in weighted {
            if r < *weight {
                return value;
            }
            r -= weight;
        }
        &weighted[weighted.len() - 1].0
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    writer.write_record(["Onnettomuustyyppi", "pohjoinen", "itä", "vakavuus", "vuosi"])?;

    let mut written = 0usize;
    let mut malformed = 0usize;
    for year in 2000..=2022 {
        for _ in 0..args.rows_per_year {
            let kind = *rng.pick(&KINDS);
            let seriousness = rng.pick(&SERIOUSNESS).to_string();
            let year = year.to_string();

            // The real register has a share of rows without a location.
            if rng.next_f64() < 0.02 {
                writer.write_record([kind, "", "", seriousness.as_str(), year.as_str()])?;
                malformed += 1;
                continue;
            }

            let (north, east, spread) = HOTSPOTS[(rng.next_u64() % HOTSPOTS.len() as u64) as usize];
            let north = format!("{:.3}", rng.gauss(north, spread));
            let east = format!("{:.3}", rng.gauss(east, spread));
            writer.write_record([
                kind,
                north.as_str(),
                east.as_str(),
                seriousness.as_str(),
                year.as_str(),
            ])?;
            written += 1;
        }
    }
    // One row with an unrecognized participant code.
    writer.write_record(["XX", "6672900.000", "25497300.000", "1", "2022"])?;
    malformed += 1;
    writer.flush()?;

    println!(
        "Wrote {written} accidents and {malformed} malformed rows to {}",
        args.output.display()
    );
    Ok(())
}

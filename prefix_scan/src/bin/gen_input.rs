use clap::Parser;
use prefix_scan::input;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_hc::Hc128Rng;
use std::{error::Error, fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "gen-input")]
#[command(version, about = "Write a random input file for prefix-scan", long_about = None)]
struct Cli {
    /// Number of elements to generate
    count: usize,

    /// Smallest value, inclusive
    #[arg(long, default_value_t = -100, allow_negative_numbers = true)]
    min: i32,

    /// Largest value, exclusive
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    max: i32,

    /// Seed for a reproducible sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Output file, `input_test_<count>.txt` by default
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.min >= cli.max {
        return Err(format!("empty range: --min {} must be below --max {}", cli.min, cli.max).into());
    }

    let xs = match cli.seed {
        Some(seed) => random_sequence(cli.count, cli.min, cli.max, &mut Hc128Rng::seed_from_u64(seed)),
        None => random_sequence(cli.count, cli.min, cli.max, &mut StdRng::from_entropy()),
    };

    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("input_test_{}.txt", cli.count)));
    fs::write(&path, input::format_input(&xs))?;

    println!("{:?}", xs);
    log::info!("wrote {} elements to {}", xs.len(), path.display());
    Ok(())
}

fn random_sequence(count: usize, min: i32, max: i32, rng: &mut impl Rng) -> Vec<i32> {
    (0..count).map(|_| rng.gen_range(min..max)).collect()
}

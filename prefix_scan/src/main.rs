use clap::{Parser, ValueEnum};
use log::info;
use prefix_scan::{input, scan_with, Device, HostDevice, ScanOptions};
use std::{error::Error, path::PathBuf};

#[derive(Parser)]
#[command(name = "prefix-scan")]
#[command(version, about = "Block-parallel exclusive or inclusive scan of a list of integers", long_about = None)]
struct Cli {
    /// File whose first line is the sequence, e.g. `[1, 2, 3]` or `1,2,3`
    input: PathBuf,

    /// Elements (and threads) per block; 0 puts the whole input in one block
    #[arg(long = "tb", value_name = "N", default_value_t = 0)]
    thread_block: usize,

    /// Scan every block on its own instead of carrying sums across blocks
    #[arg(long)]
    independent: bool,

    /// Output the inclusive scan instead of the exclusive one
    #[arg(long)]
    inclusive: bool,

    /// Where the kernels run
    #[arg(long, value_enum, default_value_t = Backend::Host)]
    device: Backend,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// CPU emulation of the accelerator
    Host,
    /// First CUDA device (requires the `cuda` feature)
    Cuda,
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
    let xs = input::read_sequence(&cli.input)?;
    info!("read {} elements from {}", xs.len(), cli.input.display());

    let options = ScanOptions::new()
        .thread_block(cli.thread_block)
        .independent(cli.independent)
        .inclusive(cli.inclusive);

    let device = open_device(cli.device)?;
    let ys = scan_with(device.as_ref(), &xs, &options)?;
    println!("{}", input::format_sequence(&ys));
    Ok(())
}

fn open_device(backend: Backend) -> Result<Box<dyn Device>, Box<dyn Error>> {
    match backend {
        Backend::Host => Ok(Box::new(HostDevice::new())),
        #[cfg(feature = "cuda")]
        Backend::Cuda => Ok(Box::new(prefix_scan::CudaDevice::new()?)),
        #[cfg(not(feature = "cuda"))]
        Backend::Cuda => Err("this build has no CUDA support; rebuild with `--features cuda`".into()),
    }
}

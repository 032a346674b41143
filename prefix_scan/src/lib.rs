//! Block-parallel prefix sums of `i32` sequences.
//!
//! Every block of the input is scanned with a work-efficient up-sweep and
//! down-sweep in block-shared scratch memory. The block totals are scanned
//! with the same kernels, level after level, and the resulting offsets are
//! carried back into every block.

pub mod device;
mod error;
mod inclusive;
pub mod input;
pub mod launch;
pub mod reference;
mod scan;

pub use device::{Device, HostDevice};
pub use error::{Resource, ScanError};
pub use inclusive::exclusive_to_inclusive;
pub use scan::{scan, scan_with, ScanOptions};

#[cfg(feature = "cuda")]
pub use device::CudaDevice;

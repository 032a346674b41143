use crate::{
    error::ScanError,
    launch::{DeviceLimits, LaunchConfig},
};

#[cfg(feature = "cuda")]
mod cuda;
mod host;

#[cfg(feature = "cuda")]
pub use cuda::CudaDevice;
pub use host::HostDevice;

/// An accelerator that can run the two scan kernels.
///
/// Both dispatches are synchronous: when they return, `data` and
/// `block_sums` hold the device's results. A launch that exceeds `limits()`
/// fails before any element is touched.
pub trait Device {
    fn limits(&self) -> DeviceLimits;

    /// Runs the block scan kernel: every `config.block_dim` long block of
    /// `data` is replaced by its exclusive scan and its total is written to
    /// `block_sums`, which must have `config.grid_dim` elements.
    fn block_scan(
        &self,
        config: &LaunchConfig,
        data: &mut [i32],
        block_sums: &mut [i32],
    ) -> Result<(), ScanError>;

    /// Runs the carry propagation kernel: `block_sums[b]` is added to every
    /// element of block `b` of `data`.
    fn add_block_sums(
        &self,
        config: &LaunchConfig,
        data: &mut [i32],
        block_sums: &[i32],
    ) -> Result<(), ScanError>;
}

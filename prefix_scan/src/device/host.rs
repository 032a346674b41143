use super::Device;
use crate::{
    error::ScanError,
    launch::{DeviceLimits, LaunchConfig},
};
use log::trace;
use rayon::prelude::*;
use scan_kernels::{
    blelloch, carry,
    pow2::next_power_of_two,
    step::{down_sweep_steps, up_sweep_steps},
};

/// Runs the kernels on the CPU.
///
/// Blocks are independent and run on the rayon thread pool. The threads of a
/// block are run one phase at a time: every thread finishes a phase before any
/// thread starts the next, which is exactly the guarantee `sync_threads` gives
/// on the GPU.
#[derive(Debug, Clone, Default)]
pub struct HostDevice {
    limits: DeviceLimits,
}

impl HostDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DeviceLimits) -> Self {
        Self { limits }
    }
}

impl Device for HostDevice {
    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn block_scan(
        &self,
        config: &LaunchConfig,
        data: &mut [i32],
        block_sums: &mut [i32],
    ) -> Result<(), ScanError> {
        self.limits.check(config)?;
        trace!(
            "block_scan<<<{}, {}>>> over {} elements",
            config.grid_dim,
            config.block_dim,
            data.len()
        );

        let block_dim = config.block_dim as usize;
        data.par_chunks_mut(block_dim)
            .zip(block_sums.par_iter_mut())
            .for_each(|(block, block_sum)| *block_sum = scan_block(block, block_dim));

        Ok(())
    }

    fn add_block_sums(
        &self,
        config: &LaunchConfig,
        data: &mut [i32],
        block_sums: &[i32],
    ) -> Result<(), ScanError> {
        self.limits.check_elementwise(config)?;
        trace!(
            "add_block_sums<<<{}, {}>>> over {} elements",
            config.grid_dim,
            config.block_dim,
            data.len()
        );

        let block_dim = config.block_dim as usize;
        data.par_chunks_mut(block_dim)
            .zip(block_sums.par_iter())
            .for_each(|(block, block_sum)| {
                // Offsetting both buffers to this block keeps the block
                // index at zero, so the thread index is the global index.
                let sums = std::slice::from_ref(block_sum);
                for t_idx in 0..block_dim {
                    unsafe {
                        carry::add_block_sum(
                            block.as_mut_ptr(),
                            block.len(),
                            sums.as_ptr(),
                            block_dim,
                            t_idx,
                        )
                    };
                }
            });

        Ok(())
    }
}

/// Runs `phase` for every thread of the block. Returning is the barrier.
fn run_phase(block_dim: usize, mut phase: impl FnMut(usize)) {
    for t_idx in 0..block_dim {
        phase(t_idx);
    }
}

/// Exclusive scan of one block with `block_dim` threads. Returns the block
/// total.
fn scan_block(block: &mut [i32], block_dim: usize) -> i32 {
    let live_len = block.len();
    let padded_len = next_power_of_two(live_len);
    let mut scratch_buf = vec![0i32; padded_len];
    let scratch = scratch_buf.as_mut_ptr();
    let mut total = 0;

    // The pointers cover `live_len` and `padded_len` elements, which is all
    // the phase functions touch, and only one thread runs at a time.
    unsafe {
        run_phase(block_dim, |t| {
            blelloch::load_block(block.as_ptr(), live_len, scratch, padded_len, t)
        });

        for step in up_sweep_steps(padded_len) {
            run_phase(block_dim, |t| blelloch::up_sweep(scratch, padded_len, step, t));
        }

        run_phase(block_dim, |t| {
            if let Some(sum) = blelloch::take_block_total(scratch, padded_len, t) {
                total = sum;
            }
        });

        for step in down_sweep_steps(padded_len) {
            run_phase(block_dim, |t| blelloch::down_sweep(scratch, padded_len, step, t));
        }

        run_phase(block_dim, |t| {
            blelloch::store_block(scratch, block.as_mut_ptr(), live_len, t)
        });
    }

    total
}

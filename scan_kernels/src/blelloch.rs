//! Work-efficient exclusive scan of one block, held in block-shared scratch
//! memory.
//!
//! Each function below is the work a single thread does between two barriers.
//! The `exclusive_block_scan` kernel runs them with `sync_threads` in between,
//! while the host emulator runs every thread of a phase before starting the
//! next one.

/// The number of `i32` slots of shared memory reserved per block. The kernel
/// launch block size must not exceed this, since the scratch buffer is padded
/// up to the next power of two of the block size.
pub const MAX_SCRATCH_LEN: usize = 1024;

/// Copies the thread's element of the block into scratch memory and fills the
/// padding beyond the block's live elements with zeros.
///
/// # Safety
///
/// `block` must be valid for `live_len` reads and `scratch` for `padded_len`
/// writes, where `live_len <= padded_len < 2 * live_len`.
#[inline(always)]
pub unsafe fn load_block(
    block: *const i32,
    live_len: usize,
    scratch: *mut i32,
    padded_len: usize,
    t_idx: usize,
) {
    if t_idx < live_len {
        *(&mut *scratch.add(t_idx)) = *block.add(t_idx);
    }
    if t_idx + live_len < padded_len {
        *(&mut *scratch.add(t_idx + live_len)) = 0;
    }
}

/// One level of the reduction tree. The thread owns the node whose subtree
/// starts at `t_idx * step` and folds the left half into the right half.
///
/// # Safety
///
/// `scratch` must be valid for `padded_len` reads and writes.
#[inline(always)]
pub unsafe fn up_sweep(scratch: *mut i32, padded_len: usize, step: usize, t_idx: usize) {
    let k = t_idx * step;
    if k + step <= padded_len {
        let left = *scratch.add(k + step / 2 - 1);
        let right = &mut *scratch.add(k + step - 1);
        *right = right.wrapping_add(left);
    }
}

/// Takes the block total out of the root of the reduction tree, leaving the
/// identity behind so that the down-sweep produces an exclusive scan. Only
/// thread 0 does this; every other thread returns `None`.
///
/// # Safety
///
/// `scratch` must be valid for `padded_len` reads and writes.
#[inline(always)]
pub unsafe fn take_block_total(scratch: *mut i32, padded_len: usize, t_idx: usize) -> Option<i32> {
    if t_idx != 0 {
        return None;
    }
    let root = &mut *scratch.add(padded_len - 1);
    let total = *root;
    *root = 0;
    Some(total)
}

/// One level of the distribution tree: the left child receives the parent's
/// prefix and the right child receives the parent's prefix plus the left
/// child's partial sum.
///
/// # Safety
///
/// `scratch` must be valid for `padded_len` reads and writes.
#[inline(always)]
pub unsafe fn down_sweep(scratch: *mut i32, padded_len: usize, step: usize, t_idx: usize) {
    let k = t_idx * step;
    if k + step <= padded_len {
        let left = &mut *scratch.add(k + step / 2 - 1);
        let t = *left;
        let right = &mut *scratch.add(k + step - 1);
        *left = *right;
        *right = right.wrapping_add(t);
    }
}

/// Copies the thread's scanned element from scratch memory back into the
/// block. Padding slots are dropped.
///
/// # Safety
///
/// `block` must be valid for `live_len` writes and `scratch` for `live_len`
/// reads.
#[inline(always)]
pub unsafe fn store_block(scratch: *const i32, block: *mut i32, live_len: usize, t_idx: usize) {
    if t_idx < live_len {
        *(&mut *block.add(t_idx)) = *scratch.add(t_idx);
    }
}

#[cfg(target_os = "cuda")]
mod gpu {
    use super::*;
    use crate::{
        pow2::next_power_of_two,
        step::{down_sweep_steps, up_sweep_steps},
    };
    use cuda_std::{kernel, shared_array, thread};

    /// Replaces every block of `data` with its exclusive scan and writes the
    /// block's total into `block_sums[block_idx]`.
    ///
    /// The launch block size is the block length and must be at most
    /// `MAX_SCRATCH_LEN`.
    #[kernel]
    #[allow(improper_ctypes_definitions, clippy::missing_safety_doc)]
    pub unsafe fn exclusive_block_scan(data: *mut i32, len: usize, block_sums: *mut i32) {
        let t_idx = thread::thread_idx_x() as usize;
        let b_idx = thread::block_idx_x() as usize;
        let b_dim = thread::block_dim_x() as usize;

        let scratch = shared_array![i32; MAX_SCRATCH_LEN];

        let offset = b_idx * b_dim;
        let live_len = core::cmp::min(b_dim, len - offset);
        let padded_len = next_power_of_two(live_len);
        let block = data.add(offset);

        load_block(block, live_len, scratch, padded_len, t_idx);
        thread::sync_threads();

        for step in up_sweep_steps(padded_len) {
            up_sweep(scratch, padded_len, step, t_idx);
            thread::sync_threads();
        }

        if let Some(total) = take_block_total(scratch, padded_len, t_idx) {
            *(&mut *block_sums.add(b_idx)) = total;
        }
        thread::sync_threads();

        for step in down_sweep_steps(padded_len) {
            down_sweep(scratch, padded_len, step, t_idx);
            thread::sync_threads();
        }

        store_block(scratch, block, live_len, t_idx);
    }
}

#[cfg(target_os = "cuda")]
pub use gpu::exclusive_block_scan;

/// Adds the scanned total of the preceding blocks into the element at
/// `g_idx`. Every thread owns a distinct element, so no barrier is needed.
///
/// # Safety
///
/// `data` must be valid for `len` reads and writes, and `block_sums` for
/// `ceil(len / block_len)` reads.
#[inline(always)]
pub unsafe fn add_block_sum(
    data: *mut i32,
    len: usize,
    block_sums: *const i32,
    block_len: usize,
    g_idx: usize,
) {
    if g_idx < len {
        let x = &mut *data.add(g_idx);
        *x = x.wrapping_add(*block_sums.add(g_idx / block_len));
    }
}

#[cfg(target_os = "cuda")]
mod gpu {
    use super::add_block_sum;
    use cuda_std::{kernel, thread};

    /// The launch block size must equal the block length used by the scan
    /// that produced `block_sums`.
    #[kernel]
    #[allow(improper_ctypes_definitions, clippy::missing_safety_doc)]
    pub unsafe fn add_block_sums(data: *mut i32, len: usize, block_sums: *const i32) {
        let b_dim = thread::block_dim_x() as usize;
        let g_idx = (thread::thread_idx_x() + thread::block_idx_x() * thread::block_dim_x()) as usize;
        add_block_sum(data, len, block_sums, b_dim, g_idx);
    }
}

#[cfg(target_os = "cuda")]
pub use gpu::add_block_sums;

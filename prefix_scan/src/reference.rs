//! Sequential scans used as the ground truth for the block-parallel ones.

/// Exclusive scan.
pub fn exclusive_scan(xs: &[i32]) -> Vec<i32> {
    xs.iter()
        .scan(0i32, |acc, &x| {
            let prefix = *acc;
            *acc = acc.wrapping_add(x);
            Some(prefix)
        })
        .collect()
}

/// Inclusive scan.
pub fn inclusive_scan(xs: &[i32]) -> Vec<i32> {
    xs.iter()
        .scan(0i32, |acc, &x| {
            *acc = acc.wrapping_add(x);
            Some(*acc)
        })
        .collect()
}

/// Exclusive scan that restarts at zero at the start of every block.
pub fn blockwise_exclusive_scan(xs: &[i32], block_len: usize) -> Vec<i32> {
    xs.chunks(block_len).flat_map(exclusive_scan).collect()
}

/// Inclusive scan that restarts at zero at the start of every block.
pub fn blockwise_inclusive_scan(xs: &[i32], block_len: usize) -> Vec<i32> {
    xs.chunks(block_len).flat_map(inclusive_scan).collect()
}

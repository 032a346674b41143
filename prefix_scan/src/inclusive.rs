/// Turns the exclusive scan in `ys` into an inclusive one, in place.
///
/// `block_totals` are the per-block sums taken before carry propagation and
/// `block_offsets` the exclusive scan of those totals, or `None` when blocks
/// were scanned independently. Most elements are a shift by one. The element
/// before an independent block boundary can't be shifted in, since the next
/// block restarts at zero, so it is the finished block's total instead.
pub fn exclusive_to_inclusive(
    ys: &mut [i32],
    block_len: usize,
    block_totals: &[i32],
    block_offsets: Option<&[i32]>,
) {
    let n = ys.len();
    if n == 0 {
        return;
    }

    let last_block = block_totals.len() - 1;
    let last = match block_offsets {
        Some(offsets) => offsets[last_block].wrapping_add(block_totals[last_block]),
        None => block_totals[last_block],
    };

    ys.copy_within(1.., 0);
    if block_offsets.is_none() {
        for boundary in (block_len..n).step_by(block_len) {
            ys[boundary - 1] = block_totals[boundary / block_len - 1];
        }
    }
    ys[n - 1] = last;
}

/// Returns the smallest power of two greater than or equal to `n`. Zero maps
/// to one so that every block owns at least one scratch slot.
#[inline(always)]
pub fn next_power_of_two(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    if n & (n - 1) == 0 {
        return n;
    }
    1 << (usize::BITS - (n - 1).leading_zeros())
}

pub struct MultStep {
    factor: usize,
    next: usize,
}

impl Iterator for MultStep {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next;
        self.next *= self.factor;
        Some(next)
    }
}

// Returns an iterator that generates numbers by multiplying by the given
// factor.
pub fn mult_step(init: usize, factor: usize) -> MultStep {
    MultStep { factor, next: init }
}

pub struct DivStep {
    denom: usize,
    next: usize,
}

impl Iterator for DivStep {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next;
        self.next /= self.denom;
        Some(next)
    }
}

// Returns an iterator that generates numbers by dividing by the given
// denominator.
pub fn div_step(init: usize, denom: usize) -> DivStep {
    DivStep { denom, next: init }
}

/// The tree steps visited by the up-sweep of a scratch buffer of
/// `padded_len` elements: 2, 4, ..., `padded_len`.
pub fn up_sweep_steps(padded_len: usize) -> impl Iterator<Item = usize> {
    mult_step(2, 2).take_while(move |&s| s <= padded_len)
}

/// The tree steps visited by the down-sweep of a scratch buffer of
/// `padded_len` elements: `padded_len`, ..., 4, 2.
pub fn down_sweep_steps(padded_len: usize) -> impl Iterator<Item = usize> {
    div_step(padded_len, 2).take_while(|&s| s >= 2)
}

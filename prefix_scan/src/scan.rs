use crate::{
    device::{Device, HostDevice},
    error::ScanError,
    inclusive::exclusive_to_inclusive,
    launch::LaunchConfig,
};
use log::{debug, trace};

/// How a scan splits and finishes its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Elements, and threads, per block. Zero means a single block covering
    /// the whole input.
    pub thread_block: usize,
    /// Scan every block on its own, restarting at zero at each block
    /// boundary, instead of propagating carries between blocks.
    pub independent: bool,
    /// Produce an inclusive scan instead of an exclusive one.
    pub inclusive: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_block(mut self, thread_block: usize) -> Self {
        self.thread_block = thread_block;
        self
    }

    pub fn independent(mut self, independent: bool) -> Self {
        self.independent = independent;
        self
    }

    pub fn inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    /// The block length used for an input of `len` elements.
    pub fn block_len(&self, len: usize) -> usize {
        if self.thread_block == 0 {
            len
        } else {
            self.thread_block
        }
    }
}

/// Prefix sum of `xs` on the CPU emulated device.
pub fn scan(xs: &[i32], options: &ScanOptions) -> Result<Vec<i32>, ScanError> {
    scan_with(&HostDevice::new(), xs, options)
}

/// Prefix sum of `xs` on `device`.
///
/// Inputs of zero or one element scan to `[0]`. Device failures are returned
/// as is; nothing is retried.
pub fn scan_with<D>(device: &D, xs: &[i32], options: &ScanOptions) -> Result<Vec<i32>, ScanError>
where
    D: Device + ?Sized,
{
    if xs.len() <= 1 {
        return Ok(vec![0]);
    }

    let block_len = options.block_len(xs.len());
    debug!(
        "scanning {} elements in blocks of {} (independent: {}, inclusive: {})",
        xs.len(),
        block_len,
        options.independent,
        options.inclusive
    );
    if !options.independent && block_len == 1 {
        return Err(ScanError::BlockLenTooSmall);
    }

    // Every level launches with the same block size and a smaller grid, so
    // the first level decides whether the whole scan fits the device.
    device
        .limits()
        .check(&LaunchConfig::for_len(xs.len(), block_len)?)?;

    let mut ys = xs.to_vec();
    let block_totals = block_scan(device, &mut ys, block_len)?;

    let block_offsets = if options.independent {
        None
    } else {
        let block_offsets = scan_block_totals(device, &block_totals, block_len)?;
        add_block_sums(device, &mut ys, &block_offsets, block_len)?;
        Some(block_offsets)
    };

    if options.inclusive {
        exclusive_to_inclusive(&mut ys, block_len, &block_totals, block_offsets.as_deref());
    }

    Ok(ys)
}

/// Exclusive scan of the block totals, using the same kernels again.
///
/// Every level block-scans the totals of the level below, until a single
/// total is left. The exclusive scan of one total is `[0]`, and each level's
/// scan is then its block-local scan plus the scan of its own totals.
fn scan_block_totals<D>(device: &D, totals: &[i32], block_len: usize) -> Result<Vec<i32>, ScanError>
where
    D: Device + ?Sized,
{
    let mut levels = Vec::new();
    let mut pending = totals.to_vec();
    while pending.len() > 1 {
        trace!("level {}: {} block totals", levels.len() + 1, pending.len());
        let next = block_scan(device, &mut pending, block_len)?;
        levels.push(std::mem::replace(&mut pending, next));
    }

    let mut offsets = vec![0];
    while let Some(mut level) = levels.pop() {
        add_block_sums(device, &mut level, &offsets, block_len)?;
        offsets = level;
    }

    Ok(offsets)
}

/// Scans every block of `data` in place and returns the block totals.
fn block_scan<D>(device: &D, data: &mut [i32], block_len: usize) -> Result<Vec<i32>, ScanError>
where
    D: Device + ?Sized,
{
    let config = LaunchConfig::for_len(data.len(), block_len)?;
    let mut block_sums = vec![0; config.grid_dim as usize];
    device.block_scan(&config, data, &mut block_sums)?;
    Ok(block_sums)
}

fn add_block_sums<D>(
    device: &D,
    data: &mut [i32],
    block_sums: &[i32],
    block_len: usize,
) -> Result<(), ScanError>
where
    D: Device + ?Sized,
{
    let config = LaunchConfig::for_len(data.len(), block_len)?;
    device.add_block_sums(&config, data, block_sums)
}

#[cfg(test)]
mod tests {
    use super::{scan, scan_block_totals, scan_with, ScanOptions};
    use crate::{
        device::{Device, HostDevice},
        error::{Resource, ScanError},
        launch::{DeviceLimits, LaunchConfig},
    };
    use std::cell::Cell;

    /// Host device that counts the kernels launched on it.
    struct CountingDevice {
        inner: HostDevice,
        launches: Cell<usize>,
    }

    impl CountingDevice {
        fn new(limits: DeviceLimits) -> Self {
            Self {
                inner: HostDevice::with_limits(limits),
                launches: Cell::new(0),
            }
        }
    }

    impl Device for CountingDevice {
        fn limits(&self) -> DeviceLimits {
            self.inner.limits()
        }

        fn block_scan(
            &self,
            config: &LaunchConfig,
            data: &mut [i32],
            block_sums: &mut [i32],
        ) -> Result<(), ScanError> {
            self.launches.set(self.launches.get() + 1);
            self.inner.block_scan(config, data, block_sums)
        }

        fn add_block_sums(
            &self,
            config: &LaunchConfig,
            data: &mut [i32],
            block_sums: &[i32],
        ) -> Result<(), ScanError> {
            self.launches.set(self.launches.get() + 1);
            self.inner.add_block_sums(config, data, block_sums)
        }
    }

    #[test]
    fn block_len_test() {
        assert_eq!(ScanOptions::new().block_len(17), 17);
        assert_eq!(ScanOptions::new().thread_block(4).block_len(17), 4);
    }

    #[test]
    fn scan_block_totals_test() {
        let device = HostDevice::new();

        // 9 totals in blocks of 2 take four levels to collapse.
        let totals = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let offsets = scan_block_totals(&device, &totals, 2).unwrap();
        assert_eq!(offsets, vec![0, 1, 3, 6, 10, 15, 21, 28, 36]);

        let offsets = scan_block_totals(&device, &[42], 2).unwrap();
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    fn exclusive_test() {
        let options = ScanOptions::new().thread_block(3);
        let ys = scan(&[1, 2, 3, 4, 5, 6], &options).unwrap();
        assert_eq!(ys, vec![0, 1, 3, 6, 10, 15]);
    }

    #[test]
    fn independent_test() {
        let options = ScanOptions::new().thread_block(3).independent(true);
        let ys = scan(&[1, 2, 3, 4, 5, 6], &options).unwrap();
        assert_eq!(ys, vec![0, 1, 3, 0, 4, 9]);
    }

    #[test]
    fn whole_input_block_test() {
        let options = ScanOptions::new().inclusive(true);
        let ys = scan(&[1, 2, 3, 4, 5, 6], &options).unwrap();
        assert_eq!(ys, vec![1, 3, 6, 10, 15, 21]);
    }

    #[test]
    fn single_element_blocks_test() {
        let options = ScanOptions::new().thread_block(1);
        assert!(matches!(
            scan(&[1, 2, 3], &options),
            Err(ScanError::BlockLenTooSmall)
        ));

        let options = options.independent(true);
        assert_eq!(scan(&[1, 2, 3], &options).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn rejected_before_any_launch_test() {
        let device = CountingDevice::new(DeviceLimits {
            max_grid_dim: 2,
            ..DeviceLimits::default()
        });
        let xs = vec![1; 12];

        let result = scan_with(&device, &xs, &ScanOptions::new().thread_block(4));
        assert!(matches!(
            result,
            Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::GridBlocks,
                requested: 3,
                limit: 2,
            })
        ));
        assert_eq!(device.launches.get(), 0);

        // Blocks of 6 fit: two levels of block scans, then two carries.
        let ys = scan_with(&device, &xs, &ScanOptions::new().thread_block(6)).unwrap();
        assert_eq!(ys, (0..12).collect::<Vec<i32>>());
        assert_eq!(device.launches.get(), 4);
    }
}

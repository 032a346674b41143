use crate::error::{Resource, ScanError};
use scan_kernels::{blelloch::MAX_SCRATCH_LEN, pow2::next_power_of_two};
use std::mem::size_of;

/// The shape of a kernel dispatch: `grid_dim` blocks of `block_dim` threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    pub grid_dim: u32,
    pub block_dim: u32,
}

impl LaunchConfig {
    /// One thread per element, in blocks of `block_len` threads. A
    /// `block_len` of zero is rejected; resolve the whole-input sentinel with
    /// `ScanOptions::block_len` first.
    pub fn for_len(len: usize, block_len: usize) -> Result<Self, ScanError> {
        if block_len == 0 {
            return Err(ScanError::EmptyBlock);
        }
        let grid_dim = len.div_ceil(block_len);
        let grid_dim = u32::try_from(grid_dim).map_err(|_| ScanError::DeviceCapacityExceeded {
            resource: Resource::GridBlocks,
            requested: grid_dim,
            limit: u32::MAX as usize,
        })?;
        let block_dim = u32::try_from(block_len).map_err(|_| ScanError::DeviceCapacityExceeded {
            resource: Resource::ThreadsPerBlock,
            requested: block_len,
            limit: u32::MAX as usize,
        })?;
        Ok(Self {
            grid_dim,
            block_dim,
        })
    }

    /// Bytes of shared memory the block scan needs for one block.
    pub fn scratch_bytes(&self) -> usize {
        next_power_of_two(self.block_dim as usize) * size_of::<i32>()
    }
}

/// What the executing device can hold in a single launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    pub max_threads_per_block: usize,
    pub max_shared_memory_per_block: usize,
    pub max_grid_dim: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_threads_per_block: 1024,
            max_shared_memory_per_block: 48 * 1024,
            max_grid_dim: i32::MAX as usize,
        }
    }
}

impl DeviceLimits {
    /// Rejects block scan launches the device cannot run. The shared memory
    /// limit is capped by the scratch array the kernel reserves statically.
    pub fn check(&self, config: &LaunchConfig) -> Result<(), ScanError> {
        self.check_elementwise(config)?;

        let scratch_limit = self
            .max_shared_memory_per_block
            .min(MAX_SCRATCH_LEN * size_of::<i32>());
        if config.scratch_bytes() > scratch_limit {
            return Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::SharedMemoryBytes,
                requested: config.scratch_bytes(),
                limit: scratch_limit,
            });
        }

        Ok(())
    }

    /// Rejects launches of kernels that use no shared memory, such as carry
    /// propagation, that the device cannot run.
    pub fn check_elementwise(&self, config: &LaunchConfig) -> Result<(), ScanError> {
        let block_dim = config.block_dim as usize;
        if block_dim > self.max_threads_per_block {
            return Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::ThreadsPerBlock,
                requested: block_dim,
                limit: self.max_threads_per_block,
            });
        }

        let grid_dim = config.grid_dim as usize;
        if grid_dim > self.max_grid_dim {
            return Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::GridBlocks,
                requested: grid_dim,
                limit: self.max_grid_dim,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceLimits, LaunchConfig};
    use crate::error::{Resource, ScanError};

    #[test]
    fn for_len_test() {
        let config = LaunchConfig::for_len(6, 3).unwrap();
        assert_eq!(config.grid_dim, 2);
        assert_eq!(config.block_dim, 3);

        let config = LaunchConfig::for_len(7, 3).unwrap();
        assert_eq!(config.grid_dim, 3);

        let config = LaunchConfig::for_len(5, 5).unwrap();
        assert_eq!(config.grid_dim, 1);
    }

    #[test]
    fn for_len_huge_block_test() {
        // The grid size must not overflow on its way to the thread limit.
        let config = LaunchConfig::for_len(3, usize::MAX);
        assert!(matches!(
            config,
            Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::ThreadsPerBlock,
                requested: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn for_len_zero_block_test() {
        assert!(matches!(
            LaunchConfig::for_len(3, 0),
            Err(ScanError::EmptyBlock)
        ));
    }

    #[test]
    fn elementwise_ignores_shared_memory_test() {
        let limits = DeviceLimits {
            max_shared_memory_per_block: 16,
            ..DeviceLimits::default()
        };
        let config = LaunchConfig::for_len(1000, 100).unwrap();
        assert!(limits.check_elementwise(&config).is_ok());
        assert!(limits.check(&config).is_err());

        let config = LaunchConfig::for_len(4096, 2048).unwrap();
        assert!(limits.check_elementwise(&config).is_err());
    }

    #[test]
    fn scratch_bytes_test() {
        let config = LaunchConfig::for_len(3000, 1000).unwrap();
        assert_eq!(config.scratch_bytes(), 1024 * 4);
    }

    #[test]
    fn accepts_largest_block_test() {
        let limits = DeviceLimits::default();
        let config = LaunchConfig::for_len(1 << 20, 1024).unwrap();
        assert!(limits.check(&config).is_ok());
    }

    #[test]
    fn rejects_too_many_threads_test() {
        let limits = DeviceLimits::default();
        let config = LaunchConfig::for_len(4096, 2048).unwrap();
        match limits.check(&config) {
            Err(ScanError::DeviceCapacityExceeded {
                resource,
                requested,
                limit,
            }) => {
                assert_eq!(resource, Resource::ThreadsPerBlock);
                assert_eq!(requested, 2048);
                assert_eq!(limit, 1024);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_small_shared_memory_test() {
        let limits = DeviceLimits {
            max_shared_memory_per_block: 256,
            ..DeviceLimits::default()
        };
        // 100 threads pad to 128 slots of 4 bytes.
        let config = LaunchConfig::for_len(1000, 100).unwrap();
        assert!(matches!(
            limits.check(&config),
            Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::SharedMemoryBytes,
                requested: 512,
                limit: 256,
            })
        ));
    }

    #[test]
    fn rejects_large_grid_test() {
        let limits = DeviceLimits {
            max_grid_dim: 4,
            ..DeviceLimits::default()
        };
        let config = LaunchConfig::for_len(10, 2).unwrap();
        assert!(matches!(
            limits.check(&config),
            Err(ScanError::DeviceCapacityExceeded {
                resource: Resource::GridBlocks,
                ..
            })
        ));
    }
}

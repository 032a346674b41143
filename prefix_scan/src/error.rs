use std::fmt;
use thiserror::Error;

/// A device resource that a launch can exhaust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    ThreadsPerBlock,
    SharedMemoryBytes,
    GridBlocks,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::ThreadsPerBlock => "threads per block",
            Resource::SharedMemoryBytes => "shared memory bytes per block",
            Resource::GridBlocks => "blocks per grid",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("launch requests {requested} {resource}, but the device allows at most {limit}")]
    DeviceCapacityExceeded {
        resource: Resource,
        requested: usize,
        limit: usize,
    },

    /// Carry propagation recurses on one total per block, so blocks of a
    /// single element never shrink the problem.
    #[error("carry propagation needs a thread block of at least 2 elements")]
    BlockLenTooSmall,

    #[error("a launch needs at least one thread per block")]
    EmptyBlock,

    #[cfg(feature = "cuda")]
    #[error("CUDA driver error: {0}")]
    Driver(#[from] cust::error::CudaError),
}

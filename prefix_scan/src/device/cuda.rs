use super::Device;
use crate::{
    error::ScanError,
    launch::{DeviceLimits, LaunchConfig},
};
use cust::{
    device::{Device as CudaDev, DeviceAttribute},
    prelude::*,
};
use log::{debug, trace};

static PTX: &str = include_str!("../../../resources/scan_kernels.ptx");

/// Runs the kernels on the first CUDA device.
pub struct CudaDevice {
    module: Module,
    stream: Stream,
    limits: DeviceLimits,
    // Declared last so it is dropped after the module and stream.
    _ctx: Context,
}

impl CudaDevice {
    pub fn new() -> Result<Self, ScanError> {
        let ctx = cust::quick_init()?;
        let device = CudaDev::get_device(0)?;
        let limits = DeviceLimits {
            max_threads_per_block: device.get_attribute(DeviceAttribute::MaxThreadsPerBlock)?
                as usize,
            max_shared_memory_per_block: device
                .get_attribute(DeviceAttribute::MaxSharedMemoryPerBlock)?
                as usize,
            max_grid_dim: device.get_attribute(DeviceAttribute::MaxGridDimX)? as usize,
        };
        debug!("CUDA device {}: {:?}", device.name()?, limits);

        let module = Module::from_ptx(PTX, &[])?;
        let stream = Stream::new(StreamFlags::NON_BLOCKING, None)?;

        Ok(Self {
            module,
            stream,
            limits,
            _ctx: ctx,
        })
    }
}

impl Device for CudaDevice {
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
            "exclusive_block_scan<<<{}, {}>>> over {} elements",
            config.grid_dim,
            config.block_dim,
            data.len()
        );

        let dev_data = DeviceBuffer::from_slice(data)?;
        let dev_block_sums = DeviceBuffer::from_slice(block_sums)?;

        let kernel = self.module.get_function("exclusive_block_scan")?;
        let stream = &self.stream;
        unsafe {
            launch!(
                kernel<<<config.grid_dim, config.block_dim, 0, stream>>>(
                    dev_data.as_device_ptr(),
                    dev_data.len(),
                    dev_block_sums.as_device_ptr()
                )
            )?;
        }
        stream.synchronize()?;

        dev_data.copy_to(data)?;
        dev_block_sums.copy_to(block_sums)?;
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

        let dev_data = DeviceBuffer::from_slice(data)?;
        let dev_block_sums = block_sums.as_dbuf()?;

        let kernel = self.module.get_function("add_block_sums")?;
        let stream = &self.stream;
        unsafe {
            launch!(
                kernel<<<config.grid_dim, config.block_dim, 0, stream>>>(
                    dev_data.as_device_ptr(),
                    dev_data.len(),
                    dev_block_sums.as_device_ptr()
                )
            )?;
        }
        stream.synchronize()?;

        dev_data.copy_to(data)?;
        Ok(())
    }
}

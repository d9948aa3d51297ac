//! Classifier architecture, compute backends, and checkpoint loading.

pub(crate) mod backend;
mod checkpoint;
mod cnn;

pub use backend::DevicePreference;
pub use cnn::DetectorCnn;

pub(crate) use backend::{CpuBackend, CpuDevice, GpuBackend, GpuDevice};
#[cfg(feature = "cuda")]
pub(crate) use backend::{CudaBackend, CudaComputeDevice};
pub(crate) use checkpoint::load_checkpoint;

use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::backend::wgpu::{Wgpu, WgpuDevice};
#[cfg(feature = "cuda")]
use burn::backend::{Cuda, cuda::CudaDevice};

pub(crate) type CpuBackend = NdArray;
pub(crate) type CpuDevice = NdArrayDevice;
pub(crate) type GpuBackend = Wgpu;
pub(crate) type GpuDevice = WgpuDevice;
#[cfg(feature = "cuda")]
pub(crate) type CudaBackend = Cuda;
#[cfg(feature = "cuda")]
pub(crate) type CudaComputeDevice = CudaDevice;

/// Compute capability preference, resolved once at model load.
///
/// The choice is made exactly once; inference calls never re-evaluate it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DevicePreference {
    /// Portable CPU execution via ndarray.
    #[default]
    Cpu,
    /// Cross-platform GPU execution via wgpu.
    Wgpu,
    /// NVIDIA GPU execution; requires the `cuda` cargo feature.
    #[cfg(feature = "cuda")]
    Cuda,
}

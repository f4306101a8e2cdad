//! Compute device selection.
//!
//! A GPU is used only if it can run every kernel the classifier needs:
//! embedding lookup, attention (matmul + softmax) and layer norm. Backends
//! missing any of them fall back to CPU.

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::LayerNorm;
use tracing::{info, warn};

use crate::model::transformer::LAYER_NORM_EPS;

/// Pick the first GPU that passes [`check_kernels`], else the CPU.
pub fn select_device() -> Device {
    for (backend, device) in gpu_candidates() {
        match check_kernels(&device) {
            Ok(()) => {
                info!("Using {} for inference", backend);
                return device;
            }
            Err(e) => warn!("{} available but failed the kernel check ({}), skipping", backend, e),
        }
    }
    info!("Using CPU for inference");
    Device::Cpu
}

/// GPUs compiled into this build that report as present.
#[allow(unused_mut)]
fn gpu_candidates() -> Vec<(&'static str, Device)> {
    let mut candidates = Vec::new();
    #[cfg(target_os = "macos")]
    if let Ok(device) = Device::new_metal(0) {
        candidates.push(("Metal GPU", device));
    }
    #[cfg(feature = "cuda")]
    if let Ok(device) = Device::new_cuda(0) {
        candidates.push(("CUDA GPU", device));
    }
    candidates
}

/// Run one tiny pass through the ops a transformer block uses.
fn check_kernels(device: &Device) -> candle_core::Result<()> {
    let ids = Tensor::new(&[[0u32, 1]], device)?;
    let table = Tensor::ones((2, 4), DType::F32, device)?;
    let xs = candle_nn::Embedding::new(table, 4).forward(&ids)?;

    let scores = xs.matmul(&xs.t()?)?;
    let xs = candle_nn::ops::softmax_last_dim(&scores)?.matmul(&xs)?;

    let norm = LayerNorm::new(
        Tensor::ones(4, DType::F32, device)?,
        Tensor::zeros(4, DType::F32, device)?,
        LAYER_NORM_EPS,
    );
    norm.forward(&xs)?.to_device(&Device::Cpu)?;
    Ok(())
}

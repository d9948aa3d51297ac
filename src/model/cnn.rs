use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{MaxPool2d, MaxPool2dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d};
use burn::prelude::*;
use burn::tensor::activation::{relu, sigmoid};

use crate::config::{CONV_CHANNELS, HIDDEN_UNITS, PipelineConfig};

/// Binary spectrogram classifier.
///
/// Three convolution stages (3×3 kernels, padding 1, stride 1) each followed
/// by batch norm, ReLU, and a 2×2 max-pool, then two fully connected layers
/// ending in a sigmoid. Field names key the checkpoint record, so they must
/// stay in sync with the serialized parameter set.
#[derive(Module, Debug)]
pub struct DetectorCnn<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    pool1: MaxPool2d,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    pool2: MaxPool2d,
    conv3: Conv2d<B>,
    bn3: BatchNorm<B, 2>,
    pool3: MaxPool2d,
    fc1: Linear<B>,
    fc2: Linear<B>,
}

impl<B: Backend> DetectorCnn<B> {
    /// Initialize the architecture for the shared shape configuration.
    pub fn init(config: &PipelineConfig, device: &B::Device) -> Self {
        let [c1, c2, c3] = CONV_CHANNELS;
        Self {
            conv1: conv3x3([1, c1], device),
            bn1: BatchNormConfig::new(c1).init(device),
            pool1: halving_pool(),
            conv2: conv3x3([c1, c2], device),
            bn2: BatchNormConfig::new(c2).init(device),
            pool2: halving_pool(),
            conv3: conv3x3([c2, c3], device),
            bn3: BatchNormConfig::new(c3).init(device),
            pool3: halving_pool(),
            fc1: LinearConfig::new(config.flattened_size(), HIDDEN_UNITS).init(device),
            fc2: LinearConfig::new(HIDDEN_UNITS, 1).init(device),
        }
    }

    /// `[batch, 1, n_mels, frames]` → probabilities `[batch, 1]` in (0, 1).
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool1.forward(relu(self.bn1.forward(self.conv1.forward(input))));
        let x = self.pool2.forward(relu(self.bn2.forward(self.conv2.forward(x))));
        let x = self.pool3.forward(relu(self.bn3.forward(self.conv3.forward(x))));
        let [batch, channels, height, width] = x.dims();
        let x = x.reshape([batch, channels * height * width]);
        let x = relu(self.fc1.forward(x));
        sigmoid(self.fc2.forward(x))
    }
}

fn conv3x3<B: Backend>(channels: [usize; 2], device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new(channels, [3, 3])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .init(device)
}

fn halving_pool() -> MaxPool2d {
    MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backend::{CpuBackend, CpuDevice};
    use burn::tensor::TensorData;

    fn model_and_device() -> (DetectorCnn<CpuBackend>, CpuDevice) {
        let device = CpuDevice::default();
        let model = DetectorCnn::<CpuBackend>::init(&PipelineConfig::default(), &device);
        (model, device)
    }

    fn input(device: &CpuDevice, batch: usize, fill: f32) -> Tensor<CpuBackend, 4> {
        let data = TensorData::new(vec![fill; batch * 128 * 301], [batch, 1, 128, 301]);
        Tensor::from_data(data, device)
    }

    #[test]
    fn forward_produces_one_probability_per_item() {
        let (model, device) = model_and_device();
        let output = model.forward(input(&device, 2, 0.1));
        assert_eq!(output.dims(), [2, 1]);
        let values = output.into_data();
        let values = values.as_slice::<f32>().unwrap();
        assert!(values.iter().all(|&p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn forward_is_deterministic_for_fixed_weights() {
        let (model, device) = model_and_device();
        let first = model.forward(input(&device, 1, 0.25)).into_data();
        let second = model.forward(input(&device, 1, 0.25)).into_data();
        let first = first.as_slice::<f32>().unwrap();
        let second = second.as_slice::<f32>().unwrap();
        assert!((first[0] - second[0]).abs() < 1e-6);
    }
}

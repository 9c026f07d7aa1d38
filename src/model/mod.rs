//! Model components and loading infrastructure.

#[cfg(feature = "local-inference")]
pub mod bundle;
pub mod device;
pub mod encoder;
pub mod head;
#[cfg(feature = "local-inference")]
pub mod onnx;
pub mod source;

#[cfg(feature = "local-inference")]
pub use bundle::load_classifier;
pub use device::Device;
pub use encoder::Encoder;
pub use head::{HeadArtifact, LinearHead};
#[cfg(feature = "local-inference")]
pub use onnx::{DEFAULT_POOLED_OUTPUT, OnnxEncoder, OnnxEncoderOptions};
pub use source::{BundleFiles, BundlePaths, ModelSource};

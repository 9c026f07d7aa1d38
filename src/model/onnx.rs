//! Pretrained encoder via ONNX Runtime.
//!
//! Expects a BERT-style graph taking `input_ids`, `attention_mask` and
//! (optionally) `token_type_ids`, all `i64` of shape `[1, seq_len]`, and
//! producing a pooled output of shape `[1, hidden]`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use super::{Device, Encoder};
use crate::error::{IcebreakerError, Result};
use crate::types::{Embedding, TokenEncoding};

/// Default name of the pooled output (HF `BertModel` export).
pub const DEFAULT_POOLED_OUTPUT: &str = "pooler_output";

/// Options for building an [`OnnxEncoder`].
#[derive(Debug, Clone)]
pub struct OnnxEncoderOptions {
    /// Graph output holding the pooled representation.
    pub pooled_output: String,
    /// Whether the graph takes a `token_type_ids` input.
    pub token_type_ids: bool,
    pub device: Device,
}

impl Default for OnnxEncoderOptions {
    fn default() -> Self {
        Self {
            pooled_output: DEFAULT_POOLED_OUTPUT.to_string(),
            token_type_ids: true,
            device: Device::default(),
        }
    }
}

/// Encoder backed by an ONNX Runtime session.
///
/// The runtime needs exclusive access to a session while it runs, so
/// concurrent calls are serialized on a mutex.
pub struct OnnxEncoder {
    session: Mutex<Session>,
    name: String,
    options: OnnxEncoderOptions,
}

impl OnnxEncoder {
    /// Load the encoder graph from a file.
    pub fn from_file(model_path: &Path, options: OnnxEncoderOptions) -> Result<Self> {
        let session = build_session(model_path, &options.device)?;
        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        Ok(Self {
            session: Mutex::new(session),
            name,
            options,
        })
    }

    /// Run the ONNX session and return the pooled output row.
    fn run_inference(&self, encoding: &TokenEncoding) -> Result<Vec<f32>> {
        let shape = [1_usize, encoding.len()];

        // ort v2 tensor views take (shape, slice)
        let input_ids_tensor =
            TensorRef::from_array_view((shape, encoding.input_ids())).map_err(|e| {
                IcebreakerError::Inference(format!("Failed to create input_ids tensor: {}", e))
            })?;

        let attention_mask_tensor = TensorRef::from_array_view((shape, encoding.attention_mask()))
            .map_err(|e| {
                IcebreakerError::Inference(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| IcebreakerError::Inference(format!("Session lock poisoned: {}", e)))?;

        let outputs = if self.options.token_type_ids {
            let type_ids = encoding.token_type_ids();
            let token_type_ids_tensor = TensorRef::from_array_view((shape, type_ids.as_slice()))
                .map_err(|e| {
                    IcebreakerError::Inference(format!(
                        "Failed to create token_type_ids tensor: {}",
                        e
                    ))
                })?;
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor,
                ])
                .map_err(|e| IcebreakerError::Inference(format!("ONNX inference failed: {}", e)))?
        } else {
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                ])
                .map_err(|e| IcebreakerError::Inference(format!("ONNX inference failed: {}", e)))?
        };

        let pooled = outputs.get(self.options.pooled_output.as_str()).ok_or_else(|| {
            IcebreakerError::Inference(format!(
                "No {:?} output found",
                self.options.pooled_output
            ))
        })?;

        // try_extract_tensor returns (&Shape, &[T])
        let (tensor_shape, data) = pooled.try_extract_tensor::<f32>().map_err(|e| {
            IcebreakerError::Inference(format!("Failed to extract pooled output: {}", e))
        })?;

        if tensor_shape.len() != 2 || tensor_shape[0] != 1 {
            return Err(IcebreakerError::Inference(format!(
                "Expected pooled output of shape [1, hidden], got {:?}",
                &tensor_shape[..]
            )));
        }

        Ok(data.to_vec())
    }
}

impl Encoder for OnnxEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, encoding: &TokenEncoding) -> Result<Embedding> {
        let values = self.run_inference(encoding)?;
        Ok(Embedding::new(values))
    }
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to create session builder: {}", e))
        })?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to set optimization level: {}", e))
        })?;

    // Configure execution provider based on device
    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| {
                    IcebreakerError::Configuration(format!("Failed to configure CUDA: {}", e))
                })?
        }
    };

    builder.commit_from_file(model_path).map_err(|e| {
        IcebreakerError::Configuration(format!(
            "Failed to load ONNX model {}: {}",
            model_path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_target_bert_export() {
        let options = OnnxEncoderOptions::default();
        assert_eq!(options.pooled_output, "pooler_output");
        assert!(options.token_type_ids);
        assert_eq!(options.device, Device::Cpu);
    }

    #[test]
    fn missing_model_file_is_configuration_error() {
        let result = OnnxEncoder::from_file(
            Path::new("/nonexistent/model.onnx"),
            OnnxEncoderOptions::default(),
        );
        assert!(matches!(result, Err(IcebreakerError::Configuration(_))));
    }
}

//! Compute device selection.

use std::fmt;
use std::str::FromStr;

use crate::error::{IcebreakerError, Result};

/// Where the encoder's forward pass runs.
///
/// Written in config as `"cpu"`, `"cuda"` or `"cuda:<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,

    #[cfg(feature = "cuda")]
    Cuda { device_id: u32 },
}

impl Device {
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }
}

impl FromStr for Device {
    type Err = IcebreakerError;

    /// A CUDA device in a build without the `cuda` feature is rejected, not
    /// downgraded to CPU.
    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value == "cpu" {
            return Ok(Self::Cpu);
        }
        let Some(rest) = value.strip_prefix("cuda") else {
            return Err(IcebreakerError::Configuration(format!(
                "Unknown device {value:?}; expected \"cpu\" or \"cuda[:id]\""
            )));
        };
        let device_id: u32 = match rest {
            "" => 0,
            _ => rest
                .strip_prefix(':')
                .and_then(|id| id.parse().ok())
                .ok_or_else(|| {
                    IcebreakerError::Configuration(format!(
                        "Invalid CUDA device id in {value:?}"
                    ))
                })?,
        };
        cuda_device(device_id, &value)
    }
}

#[cfg(feature = "cuda")]
fn cuda_device(device_id: u32, _value: &str) -> Result<Device> {
    Ok(Device::Cuda { device_id })
}

#[cfg(not(feature = "cuda"))]
fn cuda_device(_device_id: u32, value: &str) -> Result<Device> {
    Err(IcebreakerError::Configuration(format!(
        "Device {value:?} requires building with the `cuda` feature"
    )))
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            #[cfg(feature = "cuda")]
            Self::Cuda { device_id } => write!(f, "cuda:{device_id}"),
        }
    }
}

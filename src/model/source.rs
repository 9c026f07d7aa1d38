//! Model bundle location and download logic.
//!
//! A bundle is the three files that must be loaded together: the encoder
//! graph, the tokenizer it was trained with, and the fine-tuned head.

use crate::error::{IcebreakerError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File names of the bundle parts, relative to the bundle root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleFiles {
    #[serde(default = "default_encoder_file")]
    pub encoder: String,
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer: String,
    #[serde(default = "default_head_file")]
    pub head: String,
}

impl Default for BundleFiles {
    fn default() -> Self {
        Self {
            encoder: default_encoder_file(),
            tokenizer: default_tokenizer_file(),
            head: default_head_file(),
        }
    }
}

fn default_encoder_file() -> String {
    "model.onnx".to_string()
}

fn default_tokenizer_file() -> String {
    "tokenizer.json".to_string()
}

fn default_head_file() -> String {
    "head.json".to_string()
}

/// Resolved local paths of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub encoder: PathBuf,
    pub tokenizer: PathBuf,
    pub head: PathBuf,
}

/// Source for a model bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from HuggingFace Hub repository.
    HuggingFace {
        /// Repository ID (e.g., "someone/opening-line-bert").
        repo_id: String,
        /// Pinned revision (branch, tag or commit). `None` means `main`.
        revision: Option<String>,
    },

    /// Load from a local directory.
    Local {
        /// Bundle root directory.
        dir: PathBuf,
    },
}

impl ModelSource {
    /// Create a HuggingFace source.
    pub fn huggingface(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
        }
    }

    /// Create a HuggingFace source pinned to a revision.
    pub fn huggingface_revision(repo_id: impl Into<String>, revision: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: Some(revision.into()),
        }
    }

    /// Create a local source.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local { dir: dir.into() }
    }

    /// Short description for logging.
    pub fn describe(&self) -> String {
        match self {
            Self::HuggingFace {
                repo_id,
                revision: Some(rev),
            } => format!("hf:{repo_id}@{rev}"),
            Self::HuggingFace { repo_id, .. } => format!("hf:{repo_id}"),
            Self::Local { dir } => dir.display().to_string(),
        }
    }

    /// Resolve the bundle to local paths.
    ///
    /// For HuggingFace sources, downloads the files if not cached.
    /// For local sources, checks that every file exists.
    pub fn resolve(&self, files: &BundleFiles, cache_dir: Option<&Path>) -> Result<BundlePaths> {
        match self {
            Self::HuggingFace { repo_id, revision } => {
                download_bundle(repo_id, revision.as_deref(), files, cache_dir)
            }
            Self::Local { dir } => {
                if !dir.is_dir() {
                    return Err(IcebreakerError::Configuration(format!(
                        "Local model directory does not exist: {}",
                        dir.display()
                    )));
                }
                Ok(BundlePaths {
                    encoder: existing_file(dir, &files.encoder)?,
                    tokenizer: existing_file(dir, &files.tokenizer)?,
                    head: existing_file(dir, &files.head)?,
                })
            }
        }
    }
}

fn existing_file(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(IcebreakerError::Configuration(format!(
            "Model bundle file is missing: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Download the bundle files from HuggingFace Hub.
#[cfg(feature = "local-inference")]
fn download_bundle(
    repo_id: &str,
    revision: Option<&str>,
    files: &BundleFiles,
    cache_dir: Option<&Path>,
) -> Result<BundlePaths> {
    use hf_hub::api::sync::ApiBuilder;
    use hf_hub::{Repo, RepoType};

    let mut builder = ApiBuilder::new();
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().map_err(|e| {
        IcebreakerError::Configuration(format!("Failed to initialize HF API: {}", e))
    })?;

    let repo = match revision {
        Some(rev) => api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            rev.to_string(),
        )),
        None => api.model(repo_id.to_string()),
    };

    let fetch = |file: &str| {
        repo.get(file).map_err(|e| {
            IcebreakerError::Configuration(format!(
                "Failed to download {} from {}: {}",
                file, repo_id, e
            ))
        })
    };

    Ok(BundlePaths {
        encoder: fetch(&files.encoder)?,
        tokenizer: fetch(&files.tokenizer)?,
        head: fetch(&files.head)?,
    })
}

#[cfg(not(feature = "local-inference"))]
fn download_bundle(
    repo_id: &str,
    _revision: Option<&str>,
    _files: &BundleFiles,
    _cache_dir: Option<&Path>,
) -> Result<BundlePaths> {
    Err(IcebreakerError::Configuration(format!(
        "Cannot fetch {repo_id}: built without the `local-inference` feature"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_file_names() {
        let files = BundleFiles::default();
        assert_eq!(files.encoder, "model.onnx");
        assert_eq!(files.tokenizer, "tokenizer.json");
        assert_eq!(files.head, "head.json");
    }

    #[test]
    fn local_resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["model.onnx", "tokenizer.json", "head.json"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let paths = ModelSource::local(dir.path())
            .resolve(&BundleFiles::default(), None)
            .unwrap();
        assert_eq!(paths.head, dir.path().join("head.json"));
        assert_eq!(paths.encoder, dir.path().join("model.onnx"));
    }

    #[test]
    fn local_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.onnx"), b"x").unwrap();
        fs::write(dir.path().join("tokenizer.json"), b"x").unwrap();
        let err = ModelSource::local(dir.path())
            .resolve(&BundleFiles::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("head.json"));
    }

    #[test]
    fn local_missing_dir_is_error() {
        let err = ModelSource::local("/nonexistent/icebreaker-model")
            .resolve(&BundleFiles::default(), None)
            .unwrap_err();
        assert!(matches!(err, IcebreakerError::Configuration(_)));
    }

    #[test]
    fn describe_sources() {
        assert_eq!(ModelSource::huggingface("a/b").describe(), "hf:a/b");
        assert_eq!(
            ModelSource::huggingface_revision("a/b", "v1").describe(),
            "hf:a/b@v1"
        );
    }
}

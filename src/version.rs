//! Build metadata for `icebreaker info` and the startup log line.

use serde::Serialize;

/// Crate version.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branch the binary was built from ("unknown" outside a git checkout).
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Commit the binary was built from ("unknown" outside a git checkout).
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// What was compiled in.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub commit: String,
    pub dirty: bool,
    pub local_inference: bool,
    pub cuda: bool,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: GIT_BRANCH,
            commit: GIT_SHA.chars().take(7).collect(),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
            local_inference: cfg!(feature = "local-inference"),
            cuda: cfg!(feature = "cuda"),
        }
    }
}

/// `0.1.0+main.abc1234`, with `.dirty` appended for uncommitted builds.
pub fn version_string() -> String {
    let info = BuildInfo::current();
    let dirty = if info.dirty { ".dirty" } else { "" };
    format!("{}+{}.{}{dirty}", info.version, info.branch, info.commit)
}

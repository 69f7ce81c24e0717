//! Error types for gvmagic-core.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// All errors that can arise from a single render invocation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The OS could not start the executable (missing binary, permission denied, ...).
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran and exited with a non-zero status.
    #[error("{program} returned {}\n[==== stderr ====]\n{stderr}", describe_code(.code))]
    Exit {
        program: String,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// The executable did not exit within the configured timeout and was killed.
    #[error("{program} did not finish within {}ms and was killed", millis(.after))]
    Timeout { program: String, after: Duration },

    /// Pipe or wait failure while the child was running.
    #[error("I/O error while {stage}: {source}")]
    Io {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// `true` when the executable could not be started at all.
    pub fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

fn millis(after: &Duration) -> u128 {
    after.as_millis()
}

pub(crate) fn io_err(stage: &'static str, source: std::io::Error) -> RenderError {
    RenderError::Io { stage, source }
}

/// Errors from loading `~/.gvmagic/config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

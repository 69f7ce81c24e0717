//! Executable Locator — decides which `dot` binary the invoker launches.
//!
//! Resolution is a pure function of [`LocatorInputs`], a snapshot of the
//! process environment taken once at start-up:
//!
//! 1. explicit path (`--dot` / `GVMAGIC_DOT`)
//! 2. `executable` from the config file
//! 3. bundled-distribution glob (only when the `WINPYDIR` marker names a
//!    WinPython layout)
//! 4. bare `dot`, left to the OS search path
//!
//! Nothing here fails: a bare name that does not exist only surfaces as a
//! spawn error when the invoker runs it.

use std::path::{Path, PathBuf};

use crate::config::GvConfig;
use crate::types::{ExecutableRef, Located, ResolutionSource};

/// Environment variable naming an explicit `dot` executable.
pub const EXPLICIT_ENV: &str = "GVMAGIC_DOT";

/// Environment variable set by the bundled distribution's launcher scripts.
pub const BUNDLE_MARKER_ENV: &str = "WINPYDIR";

/// Substring of the marker value that identifies the bundled layout.
pub const BUNDLE_MARKER: &str = "WinPython";

/// Sibling directories searched under the bundle root, in order. The second
/// spelling matches installs produced by older bundle releases.
const BUNDLE_GRAPHVIZ_DIRS: &[&str] = &["Graphviz", "Grapviz"];

/// Snapshot of everything the locator looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorInputs {
    pub explicit: Option<PathBuf>,
    pub configured: Option<PathBuf>,
    pub bundle_prefix: Option<String>,
}

impl LocatorInputs {
    /// Read [`EXPLICIT_ENV`] and [`BUNDLE_MARKER_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self {
            explicit: non_empty_env(EXPLICIT_ENV).map(PathBuf::from),
            configured: None,
            bundle_prefix: non_empty_env(BUNDLE_MARKER_ENV),
        }
    }

    /// Fill `configured` from a loaded config file.
    pub fn with_config(mut self, config: &GvConfig) -> Self {
        self.configured = config.executable.clone();
        self
    }

    /// Override `explicit`, e.g. from a command-line flag.
    pub fn with_explicit(mut self, explicit: Option<PathBuf>) -> Self {
        if explicit.is_some() {
            self.explicit = explicit;
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the executable. Call once and hand the result to the invoker.
pub fn locate(inputs: &LocatorInputs) -> Located {
    if let Some(path) = &inputs.explicit {
        tracing::debug!(path = %path.display(), "using explicit dot executable");
        return Located {
            executable: ExecutableRef::Path(path.clone()),
            source: ResolutionSource::Explicit,
        };
    }

    if let Some(path) = &inputs.configured {
        tracing::debug!(path = %path.display(), "using configured dot executable");
        return Located {
            executable: ExecutableRef::Path(path.clone()),
            source: ResolutionSource::Config,
        };
    }

    if let Some(prefix) = inputs.bundle_prefix.as_deref() {
        if let Some(path) = bundled_candidates(prefix).into_iter().next() {
            tracing::debug!(path = %path.display(), "found bundled dot executable");
            return Located {
                executable: ExecutableRef::Path(path),
                source: ResolutionSource::Bundled,
            };
        }
        tracing::debug!(prefix, "bundle marker present but no dot executable matched");
    }

    Located {
        executable: ExecutableRef::default(),
        source: ResolutionSource::SearchPath,
    }
}

/// Directory the bundled distribution is unpacked into, derived from the
/// marker value: everything before the first [`BUNDLE_MARKER`].
pub fn bundle_root(prefix: &str) -> Option<PathBuf> {
    let (root, _) = prefix.split_once(BUNDLE_MARKER)?;
    Some(PathBuf::from(root))
}

/// All `dot.exe` candidates under the bundle root, in search order.
///
/// Each directory spelling is globbed separately and its matches kept in
/// lexical order, so the first entry is the one [`locate`] picks.
pub fn bundled_candidates(prefix: &str) -> Vec<PathBuf> {
    let Some(root) = bundle_root(prefix) else {
        return Vec::new();
    };

    BUNDLE_GRAPHVIZ_DIRS
        .iter()
        .flat_map(|dir| glob_matches(&bundle_pattern(&root, dir)))
        .collect()
}

fn bundle_pattern(root: &Path, graphviz_dir: &str) -> String {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let tail: PathBuf = [graphviz_dir, "graphviz-*-win", "bin", "dot.exe"]
        .iter()
        .collect();
    if escaped_root.is_empty() {
        tail.to_string_lossy().into_owned()
    } else {
        Path::new(&escaped_root)
            .join(tail)
            .to_string_lossy()
            .into_owned()
    }
}

fn glob_matches(pattern: &str) -> Vec<PathBuf> {
    let entries = match glob::glob(pattern) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(pattern, error = %err, "invalid bundle glob pattern");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable glob entry");
                None
            }
        })
        .collect()
}

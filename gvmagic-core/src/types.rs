//! Domain types shared by the locator, the invoker and the magics.

use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

/// Bare command name handed to the OS search path when nothing better is found.
pub const DOT_COMMAND: &str = "dot";

/// Output format requested from the layout engine (`-T<format>`).
pub const OUTPUT_FORMAT: &str = "svg";

// ---------------------------------------------------------------------------
// Executable reference
// ---------------------------------------------------------------------------

/// The program the invoker launches: a concrete path or a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExecutableRef {
    /// A filesystem path, used as-is.
    Path(PathBuf),
    /// A bare command name, resolved by the OS at spawn time.
    Command(String),
}

impl ExecutableRef {
    /// The value passed to `std::process::Command::new`.
    pub fn program(&self) -> &OsStr {
        match self {
            Self::Path(path) => path.as_os_str(),
            Self::Command(name) => OsStr::new(name),
        }
    }
}

impl Default for ExecutableRef {
    fn default() -> Self {
        Self::Command(DOT_COMMAND.to_owned())
    }
}

impl fmt::Display for ExecutableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Command(name) => f.write_str(name),
        }
    }
}

impl From<PathBuf> for ExecutableRef {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Which resolution rule produced a [`Located`] executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// `--dot` flag or `GVMAGIC_DOT`.
    Explicit,
    /// `executable` key of the config file.
    Config,
    /// Bundled-distribution glob search.
    Bundled,
    /// Bare name, left to the OS search path.
    SearchPath,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Explicit => "explicit",
            Self::Config => "config",
            Self::Bundled => "bundled",
            Self::SearchPath => "search-path",
        };
        f.write_str(s)
    }
}

/// Result of executable resolution; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub executable: ExecutableRef,
    pub source: ResolutionSource,
}

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

/// Raw SVG bytes exactly as the layout engine wrote them to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SvgImage(pub Vec<u8>);

impl SvgImage {
    pub const MIME: &'static str = "image/svg+xml";

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SvgImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

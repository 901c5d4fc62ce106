//! Archive compression codecs

use std::fmt;

/// Supported archive codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// gzip, `.tar.gz`
    Gzip,
    /// bzip2, `.tar.bz2`
    Bzip2,
    /// LZMA2 in an xz container, `.tar.xz` (fallback for unknown settings)
    #[default]
    Lzma,
}

impl Compression {
    /// Get the file extension for this codec (without the `.tar` part)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Bzip2 => "bz2",
            Self::Lzma => "xz",
        }
    }

    /// Full archive suffix, e.g. `.tar.gz`
    pub fn archive_suffix(&self) -> String {
        format!(".tar.{}", self.extension())
    }

    /// Parse a configured codec name, accepting the extension as an alias
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Some(Self::Gzip),
            "bzip2" | "bz2" => Some(Self::Bzip2),
            "lzma" | "xz" => Some(Self::Lzma),
            _ => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip => write!(f, "gzip"),
            Self::Bzip2 => write!(f, "bzip2"),
            Self::Lzma => write!(f, "lzma"),
        }
    }
}

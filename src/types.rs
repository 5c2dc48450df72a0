use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// How a file's state is summarised in a snapshot.
///
/// - `Hash`: digest of the full file content. Rewrites with identical
///   content (fresh mtime, same bytes) are not seen as changes.
/// - `Mtime`: last-modified timestamp. Cheaper, but any touch counts.
///
/// Exactly one method is active for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FingerprintMethod {
    #[default]
    Hash,
    Mtime,
}

impl FromStr for FingerprintMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(FingerprintMethod::Hash),
            "mtime" => Ok(FingerprintMethod::Mtime),
            other => Err(format!(
                "invalid fingerprint method: {other} (expected \"hash\" or \"mtime\")"
            )),
        }
    }
}

impl fmt::Display for FingerprintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintMethod::Hash => f.write_str("hash"),
            FingerprintMethod::Mtime => f.write_str("mtime"),
        }
    }
}

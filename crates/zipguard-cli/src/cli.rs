//! CLI argument parsing using clap.

use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use zipguard_core::SecurityConfig;

#[derive(Parser)]
#[command(name = "zipguard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Without HASH and DIR, prints the fingerprint of a valid archive.
With HASH and DIR, verifies the fingerprint and extracts into DIR.
With PREFIX, only files under PREFIX/ are extracted, with PREFIX/ stripped.")]
pub struct Cli {
    /// Path to the zip archive
    #[arg(value_name = "ZIP")]
    pub archive: PathBuf,

    /// Expected fingerprint (h1:...)
    #[arg(value_name = "HASH", requires = "dir")]
    pub hash: Option<String>,

    /// Extraction directory, must be empty or absent
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Only extract files under this prefix
    #[arg(value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Budget for archive size and total uncompressed size (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_size: Option<u64>,

    /// Maximum uncompressed size of a single file (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Which operation the positional arguments select.
    pub const fn operation(&self) -> Operation {
        if self.dir.is_some() {
            Operation::Unzip
        } else {
            Operation::Hash
        }
    }

    /// Budgets derived from the command line.
    pub fn security_config(&self) -> SecurityConfig {
        let mut config = SecurityConfig::default();
        if let Some(max) = self.max_size {
            config = config.with_max_archive_size(max).with_max_total_size(max);
            if self.max_file_size.is_none() {
                config = config.with_max_file_size(max);
            }
        }
        if let Some(max) = self.max_file_size {
            config = config.with_max_file_size(max);
        }
        config
    }
}

/// Operation performed by one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Hash,
    Unzip,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Unzip => "unzip",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

//! CLI definitions

use clap::Parser;
use std::path::PathBuf;

/// S.A.T. Mission - S.M.A.R.T. goal coaching in the terminal
#[derive(Debug, Parser)]
#[command(
    name = "sat",
    about = "Guided S.M.A.R.T. goal definition narrated by the S.A.T. mission AI",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,
}

/// Path of the developer diagnostic log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("satmission")
        .join("logs")
        .join("satmission.log")
}

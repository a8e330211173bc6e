use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "makeready")]
#[command(about = "Make-ready report generator for utility pole attachment data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the two exports and emit the make-ready report
    Report {
        /// Path to the structural-analysis (SPIDAcalc) JSON export
        structural: PathBuf,

        /// Path to the field-survey (Katapult) JSON export
        survey: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Optional TOML file overriding the report heuristics
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate both exports and print the aggregated findings
    Validate {
        /// Path to the structural-analysis (SPIDAcalc) JSON export
        structural: PathBuf,

        /// Path to the field-survey (Katapult) JSON export
        survey: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
        }
    }
}

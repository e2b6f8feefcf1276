use clap::{Parser, Subcommand, ValueEnum};
use docscrub_config::DetectorBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docscrub")]
#[command(about = "Redact personal data from Word and PowerPoint files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "DOCSCRUB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a .docx or .pptx file
    Redact {
        /// Document to redact
        input: PathBuf,

        /// Output path (default: redacted_<name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Detector backend, overriding the config
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Print the redaction report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sensitive spans detected in a text
    Analyze {
        text: String,

        /// Detector backend, overriding the config
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        #[arg(long)]
        json: bool,
    },

    /// List supported file types
    Formats,

    /// Show the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Patterns,
    Presidio,
}

impl From<Backend> for DetectorBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Patterns => DetectorBackend::Patterns,
            Backend::Presidio => DetectorBackend::Presidio,
        }
    }
}

//! Command-line surface of the `skylift` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use skylift_types::Provider;

/// Target provider flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ProviderArg {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Microsoft Azure.
    Azure,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Aws => Provider::Aws,
            ProviderArg::Gcp => Provider::Gcp,
            ProviderArg::Azure => Provider::Azure,
        }
    }
}

/// Rewrite skylift SDK calls into a provider's native SDK calls.
#[derive(Debug, Parser)]
#[command(name = "skylift")]
#[command(about = "Rewrite agnostic skylift SDK calls into provider-native code")]
pub(crate) struct Cli {
    /// Target cloud provider.
    #[arg(long, value_enum, default_value = "aws")]
    pub provider: ProviderArg,

    /// Rules directory (layout: <capability>/<provider>/rules.yaml).
    #[arg(long, default_value = "rules")]
    pub rules: PathBuf,

    /// Capability to load rules for.
    #[arg(long, default_value = "storage")]
    pub capability: String,

    /// Input file to transform (stdin when omitted).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Agnostic namespace prefix to detect.
    #[arg(long, default_value = skylift_engine::DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Python executable for the parser/validator collaborators.
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// Parser collaborator timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    pub parser_timeout: u64,

    /// Validator collaborator timeout, in seconds.
    #[arg(long, default_value_t = 5)]
    pub validator_timeout: u64,

    /// Print a unified diff of the rewrite to stderr.
    #[arg(long)]
    pub diff: bool,
}

//! skylift - rewrite agnostic SDK calls into provider-native code.
//!
//! Reads one source unit (file or stdin), loads the provider's rules,
//! runs the transformation pipeline, and writes the rewritten code to a
//! file or stdout. Warnings, added imports, requirements, and the
//! optional diff go to stderr so stdout stays pipeable.

mod cli;
mod report;

use std::fs;
use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skylift_engine::{Engine, EngineConfig};
use skylift_types::Provider;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let provider = Provider::from(args.provider);

    let engine = Engine::new(EngineConfig {
        namespace: args.namespace.clone(),
        python: args.python.clone(),
        parser_timeout: Duration::from_secs(args.parser_timeout),
        validator_timeout: Duration::from_secs(args.validator_timeout),
    })
    .context("initializing engine")?;

    let registered = engine
        .load_rules(&args.rules, provider, &args.capability)
        .with_context(|| {
            format!(
                "loading `{}` rules for {provider} from {}",
                args.capability,
                args.rules.display()
            )
        })?;
    tracing::debug!(rules = registered, "rules registered");

    let source = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };

    let outcome = match engine.transform(&source, provider).await {
        Ok(outcome) => outcome,
        Err(error) => {
            report::print_failure(&error);
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &outcome.code)
                .with_context(|| format!("writing output file {}", path.display()))?;
            eprintln!("transformed code written to {}", path.display());
        }
        None => print!("{}", outcome.code),
    }

    report::print_outcome(&outcome);
    if args.diff {
        report::print_diff(&source, &outcome.code);
    }

    Ok(())
}

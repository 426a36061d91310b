// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Thin CLI adapter over `chainval-verification`: loads JSON certificate
//! fixtures and a TOML config file from disk, wires up the reference
//! collaborator implementations from `chainval-collab`, runs one
//! `ChainValidator::validate` call, and reports the result.

mod config;
mod error;
mod fixtures;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use chainval_collab::{InMemoryDirMngr, InMemoryKeyDb, OpensslCryptoEngine, StaticAgent};
use chainval_model::{BufferSink, DiagnosticSink, TracingSink, ValidationFlags, ValidationRequest};
use chainval_verification::{ChainValidator, Session, ValidatorConfig};

use config::CliOverrides;

#[derive(Parser)]
#[command(name = "chainval")]
#[command(about = "X.509 certificate chain validation engine CLI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a target certificate against a pool of candidate issuers.
    Validate(ValidateArgs),
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// JSON chain-member-seed fixture: the validation target plus every
    /// candidate issuer/root `KeyDb` should know about.
    chain_fixture: PathBuf,

    /// JSON trust-anchor list, referencing labels from `chain_fixture`.
    trust_anchors: PathBuf,

    /// Optional JSON qualified-signature root list.
    #[arg(long)]
    qualified_roots: Option<PathBuf>,

    /// Optional administrator policy allow-list file.
    #[arg(long)]
    policy_file: Option<PathBuf>,

    /// Optional TOML config file; CLI flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ISO-8601 validation time; defaults to the current UTC time.
    #[arg(long)]
    now: Option<String>,

    #[arg(long)]
    skip_revocation: bool,
    #[arg(long)]
    use_ocsp: bool,
    #[arg(long)]
    list_mode: bool,
    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_chain_validation: bool,
    #[arg(long)]
    no_policy_check: bool,
    #[arg(long)]
    no_crl_check: bool,
    #[arg(long)]
    no_trusted_cert_crl_check: bool,
    #[arg(long)]
    auto_issuer_key_retrieve: bool,
    #[arg(long)]
    ignore_expiration: bool,
    #[arg(long)]
    verbose: bool,

    /// `trace`/`debug`/`info`/`warn`/`error`; overridden by `RUST_LOG` when set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    error_kind: String,
    nearest_not_after: Option<&'a str>,
    diagnostics: &'a [String],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Command::Validate(args) = cli.command;

    install_logging(&args.log_level);

    let fixture = fixtures::load_chain_fixture(&args.chain_fixture)
        .with_context(|| format!("loading chain fixture {}", args.chain_fixture.display()))?;
    let trust_anchors = fixtures::load_trust_anchors(&args.trust_anchors, &fixture)
        .with_context(|| format!("loading trust anchors {}", args.trust_anchors.display()))?;
    let qualified_roots = match &args.qualified_roots {
        Some(path) => fixtures::load_qualified_roots(path, &fixture)
            .with_context(|| format!("loading qualified roots {}", path.display()))?,
        None => Default::default(),
    };

    let file_config = config::load_file_config(args.config.as_deref())
        .with_context(|| "loading config file".to_string())?;
    let validator_config: ValidatorConfig = config::build_validator_config(
        file_config,
        CliOverrides {
            no_chain_validation: args.no_chain_validation,
            no_policy_check: args.no_policy_check,
            policy_file: args.policy_file.clone(),
            no_crl_check: args.no_crl_check,
            no_trusted_cert_crl_check: args.no_trusted_cert_crl_check,
            auto_issuer_key_retrieve: args.auto_issuer_key_retrieve,
            ignore_expiration: args.ignore_expiration,
            verbose: args.verbose,
        },
    );

    let key_db = InMemoryKeyDb::with_certs(fixture.members.clone());
    let dirmngr = InMemoryDirMngr::new(Vec::new());
    let agent = StaticAgent::new(trust_anchors, qualified_roots);
    let crypto = OpensslCryptoEngine::new();
    let validator = ChainValidator::new(&key_db, &dirmngr, &agent, &crypto, &validator_config);
    let session = Session::new();

    let now = args.now.unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
    let request = ValidationRequest {
        target: fixture.target,
        flags: ValidationFlags {
            skip_revocation: args.skip_revocation,
            use_ocsp: args.use_ocsp,
        },
        list_mode: args.list_mode,
        now,
    };

    let mut buffer = BufferSink::default();
    let mut tracing_sink = TracingSink;
    let diag: &mut dyn DiagnosticSink = if args.list_mode { &mut buffer } else { &mut tracing_sink };
    let result = validator.validate(&request, &session, diag);

    if args.list_mode {
        for line in &buffer.lines {
            println!("{line}");
        }
    }

    if args.json {
        let output = JsonOutput {
            error_kind: result.error_kind.to_string(),
            nearest_not_after: result.nearest_not_after.as_deref(),
            diagnostics: &buffer.lines,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("result: {}", result.error_kind);
        if let Some(not_after) = &result.nearest_not_after {
            println!("nearest_not_after: {not_after}");
        }
    }

    std::process::exit(if result.is_ok() { 0 } else { 1 });
}

fn install_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

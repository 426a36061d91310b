// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong loading fixtures or running the CLI itself,
/// as distinct from an engine-reported `ErrorKind` (which isn't an error at
/// all from this crate's point of view — a `badCertChain` verdict is a
/// perfectly successful CLI invocation). Surfaced to the user via
/// `anyhow::Context` at the top of `main`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing JSON fixture {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("parsing config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("fixture {path:?} names target {target:?}, which is not present among its members")]
    TargetNotFound { path: PathBuf, target: String },
}

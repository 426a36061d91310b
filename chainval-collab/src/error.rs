// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use thiserror::Error;

/// Errors a collaborator (`KeyDb`, `DirMngr`, `Agent`, `CryptoEngine`) can
/// report back to the engine. The engine's own fatal/soft split (see
/// `chainval-verification`) decides what to do with each variant; this enum
/// only has to describe *what went wrong externally*.
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("not found")]
    NotFound,
    #[error("cryptographic failure: {0}")]
    Crypto(String),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for CollabError {
    fn from(e: std::io::Error) -> Self {
        CollabError::Io(e.to_string())
    }
}

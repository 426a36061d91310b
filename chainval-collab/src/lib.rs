// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Trait definitions for the external collaborators the chain validator
//! depends on (`KeyDb`, `DirMngr`, `Agent`, `CryptoEngine`), plus reference
//! implementations: an in-memory key database, an in-memory directory/CRL
//! service, a static config-driven trust agent, and an `openssl`-backed
//! signature verifier. Real deployments swap any of these for their own
//! implementation of the trait; nothing in `chainval-verification` depends
//! on the concrete types here.

pub mod agent;
pub mod crypto;
pub mod dirmngr;
pub mod error;
pub mod fixture_cert;
pub mod key_db;

pub use agent::{Agent, StaticAgent};
pub use crypto::{CryptoEngine, OpensslCryptoEngine};
pub use dirmngr::{DirMngr, InMemoryDirMngr, RevocationStatus};
pub use error::CollabError;
pub use fixture_cert::FixtureCert;
pub use key_db::{InMemoryKeyDb, KeyDb};

/// SHA-1 fingerprint of a DER image, used as the identity key for trust
/// anchors, qualified roots, and the asked-trusted session set — matching
/// the source system's own choice of SHA-1 fingerprints for this purpose
/// (it's an identity key, not a security boundary; collisions here would
/// only cause an extra trust prompt, not a validation bypass).
pub fn fingerprint(der: &[u8]) -> [u8; 20] {
    openssl::sha::sha1(der)
}

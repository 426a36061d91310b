// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! JSON fixture formats this binary reads from disk. Since DER parsing is
//! out of scope for the engine (see `SPEC_FULL.md` §1), a `FixtureCert` *is*
//! the CLI's input format: every certificate involved in a validation run —
//! target, intermediates, roots — is authored directly in this
//! already-decoded shape.

use std::collections::HashMap;
use std::path::Path;

use chainval_collab::{fingerprint, FixtureCert};
use chainval_model::{CertHandle, TrustAnchorFlags};
use serde::Deserialize;

use crate::error::CliError;

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// One named certificate in a chain-member-seed fixture. `label` only
/// exists to let the trust-anchor and qualified-root lists refer back to a
/// specific member; it plays no role in validation itself.
#[derive(Debug, Deserialize)]
struct LabeledCert {
    label: String,
    #[serde(flatten)]
    cert: FixtureCert,
}

#[derive(Debug, Deserialize)]
struct ChainFixtureFile {
    /// Label of the certificate to validate.
    target: String,
    certs: Vec<LabeledCert>,
}

/// A parsed chain-member-seed fixture: the validation target plus every
/// candidate issuer/root `KeyDb` should know about (which includes the
/// target itself, harmlessly — the validator never looks itself up by
/// subject DN).
pub struct ChainFixture {
    pub target: CertHandle,
    pub members: Vec<CertHandle>,
    pub by_label: HashMap<String, CertHandle>,
}

pub fn load_chain_fixture(path: &Path) -> Result<ChainFixture, CliError> {
    let file: ChainFixtureFile = read_json(path)?;
    let mut by_label = HashMap::new();
    let mut members = Vec::new();
    for labeled in file.certs {
        let handle: CertHandle = labeled.cert.into_handle();
        members.push(handle.clone());
        by_label.insert(labeled.label, handle);
    }
    let target = by_label
        .get(&file.target)
        .cloned()
        .ok_or_else(|| CliError::TargetNotFound {
            path: path.to_path_buf(),
            target: file.target.clone(),
        })?;
    Ok(ChainFixture { target, members, by_label })
}

#[derive(Debug, Deserialize)]
struct TrustAnchorEntry {
    label: String,
    #[serde(default)]
    relax: bool,
}

/// Loads a trust-anchor list, resolving each entry's `label` against the
/// certificates already loaded from the chain fixture, and keying the
/// resulting map by SHA-1 fingerprint the way `StaticAgent` expects.
pub fn load_trust_anchors(
    path: &Path,
    fixture: &ChainFixture,
) -> Result<HashMap<[u8; 20], TrustAnchorFlags>, CliError> {
    let entries: Vec<TrustAnchorEntry> = read_json(path)?;
    let mut out = HashMap::new();
    for entry in entries {
        if let Some(handle) = fixture.by_label.get(&entry.label) {
            out.insert(fingerprint(handle.der()), TrustAnchorFlags { relax: entry.relax });
        } else {
            tracing::warn!(label = %entry.label, path = %path.display(), "trust anchor label not found in chain fixture");
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct QualifiedRootEntry {
    label: String,
    country: String,
}

/// Loads an optional qualified-signature root list, keyed the same way as
/// [`load_trust_anchors`].
pub fn load_qualified_roots(path: &Path, fixture: &ChainFixture) -> Result<HashMap<[u8; 20], String>, CliError> {
    let entries: Vec<QualifiedRootEntry> = read_json(path)?;
    let mut out = HashMap::new();
    for entry in entries {
        if let Some(handle) = fixture.by_label.get(&entry.label) {
            out.insert(fingerprint(handle.der()), entry.country);
        } else {
            tracing::warn!(label = %entry.label, path = %path.display(), "qualified root label not found in chain fixture");
        }
    }
    Ok(out)
}

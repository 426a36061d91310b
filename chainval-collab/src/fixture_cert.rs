// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::sync::Arc;

use chainval_model::{AuthorityKeyId, BasicConstraints, CertHandle, CertView, Extension, SignatureAlgorithm, UserData};
use serde::{Deserialize, Serialize};

/// A concrete `CertView` backed by plain, already-decoded fields rather than
/// DER. Since ASN.1 parsing is out of this workspace's scope (the engine
/// consumes already-parsed certificate views — see `SPEC_FULL.md` §1), this
/// is the "parser" the CLI and the test suite use: fixtures are authored
/// directly in this shape (typically as JSON) instead of as PEM/DER blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCert {
    pub subject_dn: String,
    pub issuer_dn: String,
    pub serial: Vec<u8>,
    pub not_before: String,
    pub not_after: String,
    #[serde(default)]
    pub extensions: Vec<Extension>,
    #[serde(default)]
    pub authority_key_id: Option<AuthorityKeyId>,
    #[serde(default)]
    pub subject_key_id: Option<Vec<u8>>,
    pub der: Vec<u8>,
    pub tbs_bytes: Vec<u8>,
    pub signature: Vec<u8>,
    pub spki: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    #[serde(default)]
    pub policies: Option<String>,
    #[serde(default)]
    pub basic_constraints: Option<BasicConstraints>,
    #[serde(default = "default_true")]
    pub can_sign_certs: bool,
    #[serde(skip, default)]
    pub user_data: UserData,
}

fn default_true() -> bool {
    true
}

impl FixtureCert {
    pub fn into_handle(self) -> CertHandle {
        Arc::new(self)
    }
}

impl CertView for FixtureCert {
    fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }

    fn serial(&self) -> &[u8] {
        &self.serial
    }

    fn not_before(&self) -> &str {
        &self.not_before
    }

    fn not_after(&self) -> &str {
        &self.not_after
    }

    fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    fn authority_key_id(&self) -> Option<AuthorityKeyId> {
        self.authority_key_id.clone()
    }

    fn subject_key_id(&self) -> Option<Vec<u8>> {
        self.subject_key_id.clone()
    }

    fn der(&self) -> &[u8] {
        &self.der
    }

    fn tbs_bytes(&self) -> &[u8] {
        &self.tbs_bytes
    }

    fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn spki(&self) -> &[u8] {
        &self.spki
    }

    fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    fn policies(&self) -> Option<&str> {
        self.policies.as_deref()
    }

    fn is_ca(&self) -> Option<BasicConstraints> {
        self.basic_constraints
    }

    fn user_data(&self) -> &UserData {
        &self.user_data
    }

    fn can_sign_certs(&self) -> bool {
        self.can_sign_certs
    }
}

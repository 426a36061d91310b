// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Fixture helpers shared by the scenario tests in this directory. These
//! build plain `FixtureCert` handles directly rather than parsing DER (DER
//! parsing is out of scope for this crate), and a `CryptoEngine` test double
//! simple enough to reason about without a real key pair: a signature
//! verifies iff its bytes equal the candidate issuer's SPKI bytes.

use std::sync::atomic::{AtomicU64, Ordering};

use chainval_collab::error::CollabError;
use chainval_collab::{CryptoEngine, FixtureCert};
use chainval_model::{AuthorityKeyId, BasicConstraints, CertHandle, Extension, SignatureAlgorithm, UserData};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

fn next_serial() -> Vec<u8> {
    NEXT_SERIAL.fetch_add(1, Ordering::Relaxed).to_be_bytes().to_vec()
}

pub struct CertSpec {
    pub subject_dn: &'static str,
    pub issuer_dn: &'static str,
    pub not_before: &'static str,
    pub not_after: &'static str,
    pub spki: &'static [u8],
    pub signature: &'static [u8],
    pub is_ca: bool,
    pub path_len: Option<u32>,
    pub authority_key_id: Option<AuthorityKeyId>,
    pub serial: Option<Vec<u8>>,
    pub extensions: Vec<Extension>,
    pub policies: Option<&'static str>,
}

impl Default for CertSpec {
    fn default() -> Self {
        Self {
            subject_dn: "",
            issuer_dn: "",
            not_before: "2020-01-01T00:00:00Z",
            not_after: "2030-01-01T00:00:00Z",
            spki: b"",
            signature: b"",
            is_ca: true,
            path_len: None,
            authority_key_id: None,
            serial: None,
            extensions: Vec::new(),
            policies: None,
        }
    }
}

pub fn build(spec: CertSpec) -> CertHandle {
    let serial = spec.serial.unwrap_or_else(next_serial);
    // Includes `spki` so that two fixtures sharing subject/issuer/serial
    // (the "same DN/serial, different key" scenario `IssuerResolver` has to
    // disambiguate) still get distinct DER images for the dedup-by-image
    // logic to tell apart.
    let der = format!("der:{}:{}:{:?}:{:?}", spec.subject_dn, spec.issuer_dn, serial, spec.spki).into_bytes();
    FixtureCert {
        subject_dn: spec.subject_dn.to_string(),
        issuer_dn: spec.issuer_dn.to_string(),
        serial,
        not_before: spec.not_before.to_string(),
        not_after: spec.not_after.to_string(),
        extensions: spec.extensions,
        authority_key_id: spec.authority_key_id,
        subject_key_id: None,
        der: der.clone(),
        tbs_bytes: der,
        signature: spec.signature.to_vec(),
        spki: spec.spki.to_vec(),
        signature_algorithm: SignatureAlgorithm::RsaPkcs1Sha256,
        policies: spec.policies.map(str::to_string),
        basic_constraints: Some(BasicConstraints {
            is_ca: spec.is_ca,
            path_len: spec.path_len,
        }),
        can_sign_certs: spec.is_ca,
        user_data: UserData::new(),
    }
    .into_handle()
}

/// A `CryptoEngine` test double: `verify_signature` succeeds iff `sig`'s
/// bytes equal `issuer_spki`'s bytes. Lets scenario tests control which
/// candidate issuer a signature "belongs to" just by picking matching byte
/// strings, without needing real key material.
#[derive(Debug, Default)]
pub struct FakeCryptoEngine;

impl CryptoEngine for FakeCryptoEngine {
    fn verify_signature(
        &self,
        issuer_spki: &[u8],
        _tbs: &[u8],
        sig: &[u8],
        _alg: SignatureAlgorithm,
    ) -> Result<(), CollabError> {
        if sig == issuer_spki {
            Ok(())
        } else {
            Err(CollabError::Crypto("signature does not match".to_string()))
        }
    }
}

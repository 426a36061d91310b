// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Small certificate-building helpers shared by this crate's unit tests.
//! Not part of the public API; every module's `#[cfg(test)] mod tests`
//! reaches for `crate::test_support::*` instead of hand-rolling a
//! `FixtureCert` inline.

use std::sync::atomic::{AtomicU64, Ordering};

use chainval_collab::FixtureCert;
use chainval_model::{AuthorityKeyId, BasicConstraints, CertHandle, SignatureAlgorithm, UserData};

/// Most test certs carry no Authority Key Identifier at all; named so call
/// sites reads as "this is the root, it has nothing interesting in its AKI"
/// rather than a bare `None`.
pub const SELF_SIGNED_AKI: Option<AuthorityKeyId> = None;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Builds a `CertHandle` with the given subject/issuer DN and AKI. Every
/// call gets a distinct serial and DER image (so `IssuerResolver`'s
/// DER-based dedup never collapses two intentionally-distinct test certs),
/// dated comfortably inside `2020-01-01T00:00:00Z` .. `2030-01-01T00:00:00Z`,
/// CA-capable with no path length constraint, RSA PKCS#1 SHA-256.
pub fn make_cert(subject_dn: &str, issuer_dn: &str, aki: Option<AuthorityKeyId>) -> CertHandle {
    let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
    make_cert_with_serial(subject_dn, issuer_dn, aki, serial)
}

pub fn make_cert_with_serial(
    subject_dn: &str,
    issuer_dn: &str,
    aki: Option<AuthorityKeyId>,
    serial: u64,
) -> CertHandle {
    let der = format!("der:{subject_dn}:{issuer_dn}:{serial}").into_bytes();
    FixtureCert {
        subject_dn: subject_dn.to_string(),
        issuer_dn: issuer_dn.to_string(),
        serial: serial.to_be_bytes().to_vec(),
        not_before: "2020-01-01T00:00:00Z".to_string(),
        not_after: "2030-01-01T00:00:00Z".to_string(),
        extensions: Vec::new(),
        authority_key_id: aki,
        subject_key_id: None,
        der: der.clone(),
        tbs_bytes: der,
        signature: Vec::new(),
        spki: Vec::new(),
        signature_algorithm: SignatureAlgorithm::RsaPkcs1Sha256,
        policies: None,
        basic_constraints: Some(BasicConstraints {
            is_ca: true,
            path_len: None,
        }),
        can_sign_certs: true,
        user_data: UserData::new(),
    }
    .into_handle()
}

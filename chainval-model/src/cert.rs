// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A single X.509 extension as exposed to the chain validator: its OID in
/// dotted-decimal form, whether it was marked critical, and its raw value.
///
/// The validator never decodes extension values itself beyond the few it is
/// specifically documented to understand (`certificatePolicies`, Basic
/// Constraints via [`CertView::is_ca`]); everything else is opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extension {
    pub oid: String,
    pub critical: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Vec<u8>,
}

/// `authorityKeyIdentifier`, decomposed into the three sub-fields the issuer
/// resolver cares about. A real certificate carries at most one of
/// `(issuer_name, serial)` or `key_id`, but nothing here enforces that; the
/// resolver simply prefers the issuer/serial form when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorityKeyId {
    #[cfg_attr(feature = "serde", serde(default))]
    pub key_id: Option<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub issuer_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub serial: Option<Vec<u8>>,
}

/// Basic Constraints, as returned by [`CertView::is_ca`]. `path_len` mirrors
/// the wire encoding: `None` means "no `pathLenConstraint` present", i.e.
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicConstraints {
    pub is_ca: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub path_len: Option<u32>,
}

/// The signature algorithm a certificate was signed with, as a closed set
/// rather than a raw OID. `CryptoEngine` implementations switch on this to
/// pick a digest and padding scheme; `CertView` implementations are
/// responsible for mapping whatever they parsed into one of these variants
/// (or refusing to construct a `CertView` at all for anything else, which is
/// the parser's business, not the validator's).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignatureAlgorithm {
    RsaPkcs1Sha256,
    RsaPkcs1Sha384,
    RsaPkcs1Sha512,
    RsaPssSha256,
    RsaPssSha384,
    RsaPssSha512,
    EcdsaSha256,
    EcdsaSha384,
    EcdsaSha512,
}

/// The mutable side-map that travels with every certificate handle.
///
/// Real certificate objects in the source system are otherwise immutable
/// parsed structures; the validator (and the qualified-signature classifier
/// and the RegTP workaround in particular) need a place to cache a few bytes
/// of derived state so that repeat validations of the same certificate don't
/// redo expensive classification work. This is that place: a small,
/// internally-synchronized string-keyed byte map. One writer per certificate
/// is assumed (see the crate-level concurrency notes); the mutex exists so
/// that sharing a `CertView` across threads is merely slow, never unsound.
#[derive(Debug, Default)]
pub struct UserData(Mutex<HashMap<&'static str, Vec<u8>>>);

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.0.lock().unwrap().get(key).cloned()
    }

    pub fn set(&self, key: &'static str, value: Vec<u8>) {
        self.0.lock().unwrap().insert(key, value);
    }
}

/// Read-only projection of a parsed certificate, plus the one mutable slot
/// (user data) that the validator is allowed to write.
///
/// This is the `CertView` / `CertParser` boundary described in the engine's
/// scope: everything about *how* a certificate was decoded from DER lives on
/// the other side of this trait. The validator only ever sees what's exposed
/// here.
pub trait CertView: Send + Sync {
    fn subject_dn(&self) -> &str;
    fn issuer_dn(&self) -> &str;
    /// This certificate's own serial number, matched against a child's
    /// `authorityKeyIdentifier.serial` by the issuer resolver.
    fn serial(&self) -> &[u8];

    /// ISO-8601 `notBefore`, e.g. `"2020-01-01T00:00:00Z"`.
    fn not_before(&self) -> &str;
    /// ISO-8601 `notAfter`. Normalised so that lexicographic string
    /// comparison agrees with chronological order, matching the source
    /// system's `exptime = min(exptime, notAfter)` string-compare idiom.
    fn not_after(&self) -> &str;

    fn extensions(&self) -> &[Extension];

    fn extension(&self, oid: &str) -> Option<&Extension> {
        self.extensions().iter().find(|e| e.oid == oid)
    }

    fn authority_key_id(&self) -> Option<AuthorityKeyId>;
    fn subject_key_id(&self) -> Option<Vec<u8>>;

    /// Raw DER image of the whole certificate; used only for byte-wise
    /// dedup when walking alternative issuer candidates.
    fn der(&self) -> &[u8];
    /// The `tbsCertificate` bytes that were signed.
    fn tbs_bytes(&self) -> &[u8];
    /// The certificate's own signature over `tbs_bytes`.
    fn signature(&self) -> &[u8];
    /// This certificate's `subjectPublicKeyInfo`, handed to `CryptoEngine`
    /// when this certificate acts as an *issuer* verifying a child.
    fn spki(&self) -> &[u8];
    /// The algorithm this certificate's own signature (see
    /// [`CertView::signature`]) was produced with.
    fn signature_algorithm(&self) -> SignatureAlgorithm;

    /// Raw `certificatePolicies` extension, pre-rendered as newline-delimited
    /// `OID:N` / `OID:C` records (non-critical / critical), or `None` if the
    /// extension is absent. See [`CertView::extensions`] for the general
    /// case; this one accessor exists because the policy checker's textual
    /// matching algorithm is specified directly against this format.
    fn policies(&self) -> Option<&str>;

    /// Basic Constraints, decoded. `None` means the extension is absent.
    fn is_ca(&self) -> Option<BasicConstraints>;

    fn user_data(&self) -> &UserData;

    /// True iff this certificate's `keyUsage` permits signing other
    /// certificates (`keyCertSign`). Certificates without a `keyUsage`
    /// extension are treated as permitting anything, matching the
    /// source system's "no keyUsage means no opinion" stance.
    fn can_sign_certs(&self) -> bool;
}

/// A cheaply-clonable, reference-counted certificate handle. Every place the
/// spec says "take a reference on entry, release on exit" is simply an
/// `Arc::clone` / drop in this reimplementation.
pub type CertHandle = Arc<dyn CertView>;

/// True iff `issuerDN == subjectDN` bytewise, i.e. `cert` is a root.
pub fn is_root(cert: &dyn CertView) -> bool {
    cert.issuer_dn() == cert.subject_dn()
}

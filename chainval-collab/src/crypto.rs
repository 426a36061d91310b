// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::SignatureAlgorithm;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Padding;
use openssl::sign::{RsaPssSaltlen, Verifier};

use crate::error::CollabError;

/// Signature verification, abstracted behind a trait so the engine never
/// links against a concrete crypto library directly. Mirrors the source
/// system's split between the validator and its `CryptoEngine`.
pub trait CryptoEngine: Send + Sync {
    /// Verify that `sig` is `issuer_spki`'s signature (under `alg`) over
    /// `tbs`. `Ok(())` means the signature checks out; `Err` means it
    /// doesn't, or the inputs couldn't even be interpreted (e.g. malformed
    /// SPKI) — the caller (the validator) treats both the same way, as a bad
    /// signature.
    fn verify_signature(
        &self,
        issuer_spki: &[u8],
        tbs: &[u8],
        sig: &[u8],
        alg: SignatureAlgorithm,
    ) -> Result<(), CollabError>;
}

/// A `CryptoEngine` backed by the `openssl` crate, covering the same
/// signature-algorithm surface the policy engine this workspace was grown
/// from permits for the web PKI profile: RSA PKCS#1v1.5 and PSS at
/// SHA-256/384/512, and ECDSA at the matching digest sizes.
#[derive(Debug, Default)]
pub struct OpensslCryptoEngine;

impl OpensslCryptoEngine {
    pub fn new() -> Self {
        Self
    }

    fn digest(alg: SignatureAlgorithm) -> MessageDigest {
        match alg {
            SignatureAlgorithm::RsaPkcs1Sha256
            | SignatureAlgorithm::RsaPssSha256
            | SignatureAlgorithm::EcdsaSha256 => MessageDigest::sha256(),
            SignatureAlgorithm::RsaPkcs1Sha384
            | SignatureAlgorithm::RsaPssSha384
            | SignatureAlgorithm::EcdsaSha384 => MessageDigest::sha384(),
            SignatureAlgorithm::RsaPkcs1Sha512
            | SignatureAlgorithm::RsaPssSha512
            | SignatureAlgorithm::EcdsaSha512 => MessageDigest::sha512(),
        }
    }
}

impl CryptoEngine for OpensslCryptoEngine {
    fn verify_signature(
        &self,
        issuer_spki: &[u8],
        tbs: &[u8],
        sig: &[u8],
        alg: SignatureAlgorithm,
    ) -> Result<(), CollabError> {
        let pkey = PKey::public_key_from_der(issuer_spki)
            .map_err(|e| CollabError::Crypto(format!("malformed SPKI: {e}")))?;

        let digest = Self::digest(alg);
        let mut verifier = Verifier::new(digest, &pkey)
            .map_err(|e| CollabError::Crypto(format!("could not build verifier: {e}")))?;

        if matches!(
            alg,
            SignatureAlgorithm::RsaPssSha256 | SignatureAlgorithm::RsaPssSha384 | SignatureAlgorithm::RsaPssSha512
        ) {
            verifier
                .set_rsa_padding(Padding::PKCS1_PSS)
                .map_err(|e| CollabError::Crypto(e.to_string()))?;
            verifier
                .set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
                .map_err(|e| CollabError::Crypto(e.to_string()))?;
        }

        verifier
            .update(tbs)
            .map_err(|e| CollabError::Crypto(e.to_string()))?;

        let ok = verifier
            .verify(sig)
            .map_err(|e| CollabError::Crypto(format!("verification failed: {e}")))?;

        if ok {
            Ok(())
        } else {
            Err(CollabError::Crypto("signature does not match".to_string()))
        }
    }
}

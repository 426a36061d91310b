// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::collections::HashSet;
use std::sync::Mutex;

use chainval_model::CertHandle;

use crate::error::CollabError;

/// Answer to "is this certificate currently valid", from a CRL or OCSP
/// responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationStatus {
    Valid,
    Revoked,
    /// No CRL is available for this issuer.
    NoCrl,
    /// A CRL is available but its `thisUpdate`/`nextUpdate` window is stale.
    CrlTooOld,
}

/// The directory/OCSP/CRL daemon and issuer-retrieval service. Named
/// `Dirmngr` in the source system; both of its jobs (revocation status,
/// external certificate lookup) live on this one trait because both are
/// backed by the same external directory service in practice.
pub trait DirMngr: Send + Sync {
    fn is_valid(
        &self,
        subject: &CertHandle,
        issuer: &CertHandle,
        use_ocsp: bool,
    ) -> Result<RevocationStatus, CollabError>;

    /// External issuer-certificate lookup by a name pattern (derived from an
    /// issuer DN by the issuer resolver). Returns whatever candidates the
    /// directory found; an empty vec, not an error, is the normal
    /// "nothing out there" outcome.
    fn lookup(&self, pattern: &str) -> Result<Vec<CertHandle>, CollabError>;
}

/// A `DirMngr` backed by an in-memory revocation table and a fixed pool of
/// certificates available for external lookup. The reference implementation
/// wired up by the CLI by default; real deployments replace this with an
/// actual directory/OCSP client.
pub struct InMemoryDirMngr {
    revoked: Mutex<HashSet<Vec<u8>>>,
    no_crl_for: Mutex<HashSet<String>>,
    lookup_pool: Vec<CertHandle>,
}

impl InMemoryDirMngr {
    pub fn new(lookup_pool: Vec<CertHandle>) -> Self {
        Self {
            revoked: Mutex::new(HashSet::new()),
            no_crl_for: Mutex::new(HashSet::new()),
            lookup_pool,
        }
    }

    /// Mark `subject`'s DER image as revoked for future `is_valid` calls.
    /// Test/fixture helper; real deployments get this from an actual CRL.
    pub fn revoke(&self, subject: &CertHandle) {
        self.revoked.lock().unwrap().insert(subject.der().to_vec());
    }

    /// Mark `issuer_dn` as having no CRL available.
    pub fn set_no_crl(&self, issuer_dn: &str) {
        self.no_crl_for.lock().unwrap().insert(issuer_dn.to_string());
    }
}

impl DirMngr for InMemoryDirMngr {
    fn is_valid(
        &self,
        subject: &CertHandle,
        issuer: &CertHandle,
        _use_ocsp: bool,
    ) -> Result<RevocationStatus, CollabError> {
        if self.revoked.lock().unwrap().contains(subject.der()) {
            return Ok(RevocationStatus::Revoked);
        }
        if self.no_crl_for.lock().unwrap().contains(issuer.subject_dn()) {
            return Ok(RevocationStatus::NoCrl);
        }
        Ok(RevocationStatus::Valid)
    }

    fn lookup(&self, pattern: &str) -> Result<Vec<CertHandle>, CollabError> {
        Ok(self
            .lookup_pool
            .iter()
            .filter(|c| c.subject_dn().contains(pattern))
            .cloned()
            .collect())
    }
}

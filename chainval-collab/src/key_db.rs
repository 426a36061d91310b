// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::sync::Mutex;

use chainval_model::CertHandle;

/// Storage and lookup for certificates, split into a permanent store and an
/// "ephemeral" overlay holding externally-retrieved certificates that
/// shouldn't be treated as permanently known.
///
/// The source system models this as a single handle with a stateful cursor
/// (`searchReset`, a sticky ephemeral-mode flag, `getCert` advancing a
/// position). Per the redesign note in `SPEC_FULL.md` §9, that's replaced
/// here with plain lazy iterators: "ephemeral or not" is a parameter to each
/// call rather than mutable handle state, so there is no cursor to reset and
/// no way to forget to restore a saved flag.
pub trait KeyDb: Send + Sync {
    /// All stored certificates whose `subjectDN == dn`.
    fn by_subject<'a>(&'a self, dn: &str, ephemeral: bool) -> Box<dyn Iterator<Item = CertHandle> + 'a>;

    /// All stored certificates whose own `(subjectDN, serial)` matches.
    fn by_issuer_serial<'a>(
        &'a self,
        issuer_name: &str,
        serial: &[u8],
        ephemeral: bool,
    ) -> Box<dyn Iterator<Item = CertHandle> + 'a>;

    /// Persist externally-retrieved certificates into the ephemeral overlay.
    fn store_ephemeral(&self, certs: Vec<CertHandle>);

    /// Best-effort cache of the `REVOKED` validity flag for `cert`. Errors
    /// are the caller's problem to ignore, per the spec ("best-effort;
    /// errors ignored"); this trait simply can't fail.
    fn mark_revoked(&self, cert: &CertHandle);

    /// True if `cert` was previously marked revoked via `mark_revoked`.
    fn is_marked_revoked(&self, cert: &CertHandle) -> bool;
}

/// A `KeyDb` backed by two in-memory `Vec`s. Good enough for the reference
/// `Agent`/`DirMngr` pairing the CLI wires up by default, and for tests.
#[derive(Default)]
pub struct InMemoryKeyDb {
    permanent: Mutex<Vec<CertHandle>>,
    ephemeral: Mutex<Vec<CertHandle>>,
    revoked: Mutex<Vec<Vec<u8>>>,
}

impl InMemoryKeyDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_certs(certs: Vec<CertHandle>) -> Self {
        Self {
            permanent: Mutex::new(certs),
            ephemeral: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, cert: CertHandle) {
        self.permanent.lock().unwrap().push(cert);
    }
}

impl KeyDb for InMemoryKeyDb {
    fn by_subject<'a>(&'a self, dn: &str, ephemeral: bool) -> Box<dyn Iterator<Item = CertHandle> + 'a> {
        let store = if ephemeral { &self.ephemeral } else { &self.permanent };
        let dn = dn.to_string();
        let matches: Vec<CertHandle> = store
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.subject_dn() == dn)
            .cloned()
            .collect();
        Box::new(matches.into_iter())
    }

    fn by_issuer_serial<'a>(
        &'a self,
        issuer_name: &str,
        serial: &[u8],
        ephemeral: bool,
    ) -> Box<dyn Iterator<Item = CertHandle> + 'a> {
        let store = if ephemeral { &self.ephemeral } else { &self.permanent };
        let issuer_name = issuer_name.to_string();
        let serial = serial.to_vec();
        let matches: Vec<CertHandle> = store
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.subject_dn() == issuer_name && c.serial() == serial.as_slice())
            .cloned()
            .collect();
        Box::new(matches.into_iter())
    }

    fn store_ephemeral(&self, certs: Vec<CertHandle>) {
        self.ephemeral.lock().unwrap().extend(certs);
    }

    fn mark_revoked(&self, cert: &CertHandle) {
        self.revoked.lock().unwrap().push(cert.der().to_vec());
    }

    fn is_marked_revoked(&self, cert: &CertHandle) -> bool {
        self.revoked.lock().unwrap().iter().any(|d| d == cert.der())
    }
}

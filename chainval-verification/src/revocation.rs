// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::{CertHandle, DiagnosticSink, ErrorKind, Severity};

use crate::config::ValidatorConfig;

/// Wraps `DirMngr::is_valid`, translating its `RevocationStatus` into the
/// `ErrorKind` the validator folds into its soft accumulators, and caching
/// `REVOKED` on the `KeyDb` entry for `subject` (best-effort; see
/// [`RevocationOracle::is_still_valid`]).
pub struct RevocationOracle<'a> {
    key_db: &'a dyn chainval_collab::KeyDb,
    dirmngr: &'a dyn chainval_collab::DirMngr,
    config: &'a ValidatorConfig,
}

impl<'a> RevocationOracle<'a> {
    pub fn new(
        key_db: &'a dyn chainval_collab::KeyDb,
        dirmngr: &'a dyn chainval_collab::DirMngr,
        config: &'a ValidatorConfig,
    ) -> Self {
        Self { key_db, dirmngr, config }
    }

    /// `ok`, `certRevoked`, `noCRL`, or `crlTooOld` for `(subject, issuer)`;
    /// skipped (returns `Ok`) when `noCRLCheck` is configured and the caller
    /// didn't request OCSP specifically. On `revoked`, best-effort marks
    /// `subject` revoked in the `KeyDb` — failures there are silently
    /// ignored, matching the spec's "best-effort; errors ignored" note.
    pub fn is_still_valid(
        &self,
        subject: &CertHandle,
        issuer: &CertHandle,
        use_ocsp: bool,
        diag: &mut dyn DiagnosticSink,
    ) -> ErrorKind {
        if self.config.no_crl_check && !use_ocsp {
            return ErrorKind::Ok;
        }

        match self.dirmngr.is_valid(subject, issuer, use_ocsp) {
            Ok(chainval_collab::RevocationStatus::Valid) => ErrorKind::Ok,
            Ok(chainval_collab::RevocationStatus::Revoked) => {
                self.key_db.mark_revoked(subject);
                ErrorKind::CertRevoked
            }
            Ok(chainval_collab::RevocationStatus::NoCrl) => ErrorKind::NoCrl,
            Ok(chainval_collab::RevocationStatus::CrlTooOld) => ErrorKind::CrlTooOld,
            Err(e) => {
                diag.emit(Severity::Warn, "revocation_oracle_unavailable", &e.to_string());
                ErrorKind::NoCrl
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chainval_collab::{InMemoryDirMngr, InMemoryKeyDb};
    use chainval_model::BufferSink;

    #[test]
    fn revoked_subject_marks_key_db() {
        let db = InMemoryKeyDb::new();
        let leaf = make_cert("CN=Leaf", "CN=Root", None);
        let root = make_cert("CN=Root", "CN=Root", SELF_SIGNED_AKI);
        let dirmngr = InMemoryDirMngr::new(vec![]);
        dirmngr.revoke(&leaf);
        let config = ValidatorConfig::default();
        let oracle = RevocationOracle::new(&db, &dirmngr, &config);
        let mut sink = BufferSink::default();

        assert_eq!(oracle.is_still_valid(&leaf, &root, false, &mut sink), ErrorKind::CertRevoked);
        assert!(db.is_marked_revoked(&leaf));
    }

    #[test]
    fn no_crl_check_skips_lookup() {
        let db = InMemoryKeyDb::new();
        let leaf = make_cert("CN=Leaf", "CN=Root", None);
        let root = make_cert("CN=Root", "CN=Root", SELF_SIGNED_AKI);
        let dirmngr = InMemoryDirMngr::new(vec![]);
        dirmngr.revoke(&leaf);
        let mut config = ValidatorConfig::default();
        config.no_crl_check = true;
        let oracle = RevocationOracle::new(&db, &dirmngr, &config);
        let mut sink = BufferSink::default();

        assert_eq!(oracle.is_still_valid(&leaf, &root, false, &mut sink), ErrorKind::Ok);
    }
}

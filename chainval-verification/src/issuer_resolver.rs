// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::CertHandle;
use chainval_collab::KeyDb;

use crate::config::ValidatorConfig;

/// Finds candidate issuer certificates for `subject`, across the permanent
/// key database, the ephemeral overlay, and (when enabled) an external
/// directory lookup.
///
/// The source system models this as a stateful cursor with a `findNext`
/// resumption mode; per the redesign note in `SPEC_FULL.md` §9 this is
/// instead a function that materializes the full ordered candidate list in
/// one call. `find_next` narrows the search to local data only (no new
/// external fetches), leaving the *order* of local candidates untouched —
/// the equivalent of "the cursor stays positioned".
pub struct IssuerResolver<'a> {
    key_db: &'a dyn KeyDb,
    dirmngr: &'a dyn chainval_collab::DirMngr,
    config: &'a ValidatorConfig,
}

impl<'a> IssuerResolver<'a> {
    pub fn new(key_db: &'a dyn KeyDb, dirmngr: &'a dyn chainval_collab::DirMngr, config: &'a ValidatorConfig) -> Self {
        Self { key_db, dirmngr, config }
    }

    /// Ordered, deduplicated (by DER image) list of candidate issuers for
    /// `subject`, whose `issuerDN` is `issuer_dn`.
    ///
    /// Search order, first hit wins at each numbered step (later steps are
    /// appended only when `find_next` keeps looking, so the validator can
    /// walk the whole list when the first candidate's signature doesn't
    /// verify):
    /// 1. AKI `(issuerName, serial)` match, local then ephemeral.
    /// 2. AKI bare `keyId` match among certs with `subjectDN == issuerDN`,
    ///    local then ephemeral.
    /// 3. External lookup keyed by a pattern derived from `issuerDN`
    ///    (skipped when `find_next`), newly stored as ephemeral, then
    ///    re-scanned by (1)/(2) restricted to ephemeral.
    /// 4. Plain `subjectDN == issuerDN` fallback, local then ephemeral.
    /// 5. A last external lookup with no AKI hint (skipped when
    ///    `find_next`).
    pub fn candidates(&self, subject: &CertHandle, issuer_dn: &str, find_next: bool) -> Vec<CertHandle> {
        let mut out: Vec<CertHandle> = Vec::new();
        let mut seen: Vec<Vec<u8>> = Vec::new();
        let mut push_all = |certs: Vec<CertHandle>, out: &mut Vec<CertHandle>, seen: &mut Vec<Vec<u8>>| {
            for c in certs {
                if !seen.contains(&c.der().to_vec()) {
                    seen.push(c.der().to_vec());
                    out.push(c);
                }
            }
        };

        let aki = subject.authority_key_id();

        // Step 1: AKI issuer+serial.
        if let Some(aki) = aki.as_ref() {
            if let (Some(issuer_name), Some(serial)) = (&aki.issuer_name, &aki.serial) {
                push_all(
                    self.key_db.by_issuer_serial(issuer_name, serial, false).collect(),
                    &mut out,
                    &mut seen,
                );
                if !find_next {
                    push_all(
                        self.key_db.by_issuer_serial(issuer_name, serial, true).collect(),
                        &mut out,
                        &mut seen,
                    );
                }
            }
        }

        // Step 2: AKI bare keyId, among subjectDN == issuerDN candidates.
        if let Some(aki) = aki.as_ref() {
            if aki.issuer_name.is_none() || aki.serial.is_none() {
                if let Some(key_id) = &aki.key_id {
                    let by_key_id = |ephemeral: bool| -> Vec<CertHandle> {
                        self.key_db
                            .by_subject(issuer_dn, ephemeral)
                            .filter(|c| c.subject_key_id().as_deref() == Some(key_id.as_slice()))
                            .collect()
                    };
                    push_all(by_key_id(false), &mut out, &mut seen);
                    if !find_next {
                        push_all(by_key_id(true), &mut out, &mut seen);
                    }
                }
            }
        }

        // Step 3: external lookup, ephemeral re-scan.
        if !find_next && self.config.auto_issuer_key_retrieve {
            let pattern = Self::lookup_pattern(issuer_dn);
            if let Ok(found) = self.dirmngr.lookup(&pattern) {
                if !found.is_empty() {
                    self.key_db.store_ephemeral(found);
                    if let Some(aki) = aki.as_ref() {
                        if let (Some(issuer_name), Some(serial)) = (&aki.issuer_name, &aki.serial) {
                            push_all(
                                self.key_db.by_issuer_serial(issuer_name, serial, true).collect(),
                                &mut out,
                                &mut seen,
                            );
                        }
                        if let Some(key_id) = &aki.key_id {
                            push_all(
                                self.key_db
                                    .by_subject(issuer_dn, true)
                                    .filter(|c| c.subject_key_id().as_deref() == Some(key_id.as_slice()))
                                    .collect(),
                                &mut out,
                                &mut seen,
                            );
                        }
                    }
                }
            }
        }

        // Step 4: plain subjectDN fallback.
        push_all(self.key_db.by_subject(issuer_dn, false).collect(), &mut out, &mut seen);
        if !find_next {
            push_all(self.key_db.by_subject(issuer_dn, true).collect(), &mut out, &mut seen);
        }

        // Step 5: last-resort external lookup with no AKI hint.
        if !find_next && self.config.auto_issuer_key_retrieve && out.is_empty() {
            let pattern = Self::lookup_pattern(issuer_dn);
            if let Ok(found) = self.dirmngr.lookup(&pattern) {
                if !found.is_empty() {
                    self.key_db.store_ephemeral(found.clone());
                    push_all(found, &mut out, &mut seen);
                }
            }
        }

        out
    }

    /// If `issuerDN` contains `",CN="`, the lookup pattern is the substring
    /// starting at `CN=`; otherwise the whole DN.
    fn lookup_pattern(issuer_dn: &str) -> String {
        match issuer_dn.find(",CN=") {
            Some(idx) => issuer_dn[idx + 1..].to_string(),
            None => issuer_dn.to_string(),
        }
    }
}

// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::{is_root, CertHandle};

const USER_DATA_KEY: &str = "regtp_ca_chainlen";
const MAX_WALK: usize = 4;

/// Recognises certificates issued under the German signature law
/// (`RegTP`/`Bundesnetzagentur`), whose CA certificates omit Basic
/// Constraints. `CAConstraintCheck` falls back to this when
/// `CertView::is_ca` says "not a CA", before declaring the chain broken.
///
/// Per `SPEC_FULL.md` §9, this type owns its *own* issuer walker — a plain
/// "find an issuer, ascend" loop with no signature verification and no call
/// back into `CAConstraintCheck` — specifically so that `CAConstraintCheck`
/// -> `RegTPWorkaround` -> (chain walk) never cycles back into
/// `CAConstraintCheck`.
pub struct RegTpWorkaround<'a> {
    key_db: &'a dyn chainval_collab::KeyDb,
    agent: &'a dyn chainval_collab::Agent,
}

impl<'a> RegTpWorkaround<'a> {
    pub fn new(key_db: &'a dyn chainval_collab::KeyDb, agent: &'a dyn chainval_collab::Agent) -> Self {
        Self { key_db, agent }
    }

    /// `Some(chain_len)` if `cert` is accepted as a RegTP CA (`chain_len` is
    /// the value `CAConstraintCheck` should treat as the certificate's
    /// `pathLenConstraint`); `None` if it is not.
    ///
    /// Consults and updates the `"regtp_ca_chainlen"` user-data cache
    /// described in §4.7 so repeat validations of the same certificate don't
    /// re-walk the chain.
    pub fn classify(&self, cert: &CertHandle) -> Option<i64> {
        if let Some(cached) = cert.user_data().get(USER_DATA_KEY) {
            return match cached.as_slice() {
                [] => None,
                [0x01, n] => Some(*n as i64),
                _ => None,
            };
        }

        let path = self.walk(cert);
        // `depth` is the number of certificates in the walk, `cert` itself
        // included. The walk only terminates "successfully" by reaching an
        // actual root; running out of issuers, or hitting the walk cap
        // without finding one, both count as "not RegTP" (depths 0 and
        // `MAX_WALK` per §4.7 are exactly these abort cases).
        let depth = path.len();
        if depth == 0 || !is_root(path.last().unwrap().as_ref()) {
            cert.user_data().set(USER_DATA_KEY, Vec::new());
            return None;
        }

        let root = path.last().unwrap();
        let country = self.agent.qualified_list_country(root).ok().flatten();
        if country.as_deref() == Some("de") {
            root.user_data().set(USER_DATA_KEY, vec![0x01, 0x01]);
            if depth > 1 {
                let below_root = &path[path.len() - 2];
                below_root.user_data().set(USER_DATA_KEY, vec![0x01, 0x00]);
            }
            let chain_len = if depth > 1 { 0 } else { 1 };
            Some(chain_len)
        } else {
            cert.user_data().set(USER_DATA_KEY, Vec::new());
            None
        }
    }

    /// Plain issuer ascent with no signature verification and no CA
    /// constraint check: just "does a cert with `subjectDN == issuerDN`
    /// exist locally (or ephemerally)", first match wins. Stops at a root or
    /// after collecting `MAX_WALK` certificates, whichever comes first.
    fn walk(&self, start: &CertHandle) -> Vec<CertHandle> {
        let mut path = vec![start.clone()];
        while path.len() < MAX_WALK {
            let current = path.last().unwrap();
            if is_root(current.as_ref()) {
                break;
            }
            let issuer_dn = current.issuer_dn().to_string();
            let next = self
                .key_db
                .by_subject(&issuer_dn, false)
                .next()
                .or_else(|| self.key_db.by_subject(&issuer_dn, true).next());
            match next {
                Some(issuer) => path.push(issuer),
                None => break,
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chainval_collab::{InMemoryKeyDb, StaticAgent};
    use std::collections::HashMap;

    #[test]
    fn non_regtp_cert_returns_none() {
        let root = make_cert("CN=Root", "CN=Root", SELF_SIGNED_AKI);
        let leaf = make_cert("CN=Leaf", "CN=Root", None);
        let db = InMemoryKeyDb::with_certs(vec![root]);
        let agent = StaticAgent::new(HashMap::new(), HashMap::new());
        let workaround = RegTpWorkaround::new(&db, &agent);

        assert_eq!(workaround.classify(&leaf), None);
        // Cached: a second call must agree without re-walking.
        assert_eq!(workaround.classify(&leaf), None);
    }

    #[test]
    fn qualified_de_root_classifies_intermediate_as_regtp_ca() {
        let root = make_cert("CN=DE Root", "CN=DE Root", SELF_SIGNED_AKI);
        let intermediate = make_cert("CN=DE Intermediate", "CN=DE Root", None);
        let db = InMemoryKeyDb::with_certs(vec![root.clone(), intermediate.clone()]);

        let mut qualified_roots = HashMap::new();
        qualified_roots.insert(chainval_collab::fingerprint(root.der()), "de".to_string());
        let agent = StaticAgent::new(HashMap::new(), qualified_roots);
        let workaround = RegTpWorkaround::new(&db, &agent);

        assert_eq!(workaround.classify(&intermediate), Some(1));
    }
}

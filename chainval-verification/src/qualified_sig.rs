// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::{CertHandle, Qualified, QualifiedListLookup};

const USER_DATA_KEY: &str = "is_qualified";

/// Determines whether a chain roots in a qualified-signature trust anchor,
/// caching the 1-byte verdict on both the root and (once known) the
/// original target certificate.
pub struct QualifiedSigClassifier;

impl QualifiedSigClassifier {
    /// Called once per root reached, only while the running classification
    /// for this validation is still `Qualified::Unknown` (the caller is
    /// responsible for that gating — see `ChainValidator::validate`).
    pub fn classify_root(root: &CertHandle, agent: &dyn chainval_collab::Agent) -> Qualified {
        if let Some(cached) = root.user_data().get(USER_DATA_KEY) {
            return match cached.first() {
                Some(1) => Qualified::Yes,
                Some(_) => Qualified::No,
                None => Qualified::Unknown,
            };
        }

        let decision = match agent.is_in_qualified_list(root) {
            Ok(QualifiedListLookup::Found) => Qualified::Yes,
            Ok(QualifiedListLookup::NotFound) => Qualified::No,
            Err(e) => {
                tracing::warn!(error = %e, "qualified-list lookup failed");
                Qualified::Unknown
            }
        };

        if decision != Qualified::Unknown {
            root.user_data().set(USER_DATA_KEY, vec![(decision == Qualified::Yes) as u8]);
        }
        decision
    }

    /// Persists a resolved verdict onto `target` once validation completes,
    /// per §4.1's "cache `is_qualified` into the original target cert".
    pub fn cache_on_target(target: &CertHandle, decision: Qualified) {
        if decision != Qualified::Unknown {
            target
                .user_data()
                .set(USER_DATA_KEY, vec![(decision == Qualified::Yes) as u8]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chainval_collab::StaticAgent;
    use std::collections::HashMap;

    #[test]
    fn unknown_root_is_classified_no_when_absent_from_qualified_list() {
        let root = make_cert("CN=Root", "CN=Root", SELF_SIGNED_AKI);
        let agent = StaticAgent::new(HashMap::new(), HashMap::new());
        assert_eq!(QualifiedSigClassifier::classify_root(&root, &agent), Qualified::No);
        // Cached afterwards.
        assert_eq!(root.user_data().get("is_qualified"), Some(vec![0]));
    }

    #[test]
    fn qualified_root_is_classified_yes() {
        let root = make_cert("CN=Root", "CN=Root", SELF_SIGNED_AKI);
        let mut qualified_roots = HashMap::new();
        qualified_roots.insert(chainval_collab::fingerprint(root.der()), "de".to_string());
        let agent = StaticAgent::new(HashMap::new(), qualified_roots);
        assert_eq!(QualifiedSigClassifier::classify_root(&root, &agent), Qualified::Yes);
        assert_eq!(root.user_data().get("is_qualified"), Some(vec![1]));
    }
}

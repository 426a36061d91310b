// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::collections::HashMap;

use chainval_model::{CertHandle, MarkTrustedOutcome, QualifiedListLookup, RootCaFlags, TrustAnchorFlags, TrustDecision};

use crate::error::CollabError;
use crate::fingerprint;

/// The trust-anchor agent: answers "is this root trusted" and "is this root
/// on the qualified-signature list", and (in principle) drives an
/// interactive "mark this root trusted" prompt.
pub trait Agent: Send + Sync {
    fn is_trusted(&self, root: &CertHandle) -> Result<RootCaFlags, CollabError>;

    fn mark_trusted_interactive(&self, root: &CertHandle) -> Result<MarkTrustedOutcome, CollabError>;

    /// The qualified-signature list's country code for `root`, or `None` if
    /// `root` isn't on it. Separated from a plain "is it qualified"
    /// predicate because `RegTPWorkaround` needs the country code
    /// specifically (`"de"`), while `QualifiedSigClassifier` only needs
    /// presence.
    fn qualified_list_country(&self, root: &CertHandle) -> Result<Option<String>, CollabError>;

    fn is_in_qualified_list(&self, root: &CertHandle) -> Result<QualifiedListLookup, CollabError> {
        Ok(match self.qualified_list_country(root)? {
            Some(_) => QualifiedListLookup::Found,
            None => QualifiedListLookup::NotFound,
        })
    }
}

/// An `Agent` backed by a static, config-loaded trust-anchor list and
/// qualified-root list, keyed by SHA-1 fingerprint of the root's DER image.
/// This is the reference implementation the CLI wires up by default; it
/// never prompts (there is no terminal to prompt on in a batch validator),
/// so `mark_trusted_interactive` always reports `NotSupported`, matching the
/// spec's own "disable further prompts for this process" fallback path.
pub struct StaticAgent {
    trust_anchors: HashMap<[u8; 20], TrustAnchorFlags>,
    qualified_roots: HashMap<[u8; 20], String>,
}

impl StaticAgent {
    pub fn new(trust_anchors: HashMap<[u8; 20], TrustAnchorFlags>, qualified_roots: HashMap<[u8; 20], String>) -> Self {
        Self {
            trust_anchors,
            qualified_roots,
        }
    }
}

impl Agent for StaticAgent {
    fn is_trusted(&self, root: &CertHandle) -> Result<RootCaFlags, CollabError> {
        let fp = fingerprint(root.der());
        Ok(match self.trust_anchors.get(&fp) {
            Some(flags) => RootCaFlags {
                decision: TrustDecision::Trusted,
                anchor_flags: *flags,
            },
            None => RootCaFlags {
                decision: TrustDecision::NotTrusted,
                anchor_flags: TrustAnchorFlags::default(),
            },
        })
    }

    fn mark_trusted_interactive(&self, _root: &CertHandle) -> Result<MarkTrustedOutcome, CollabError> {
        Ok(MarkTrustedOutcome::NotSupported)
    }

    fn qualified_list_country(&self, root: &CertHandle) -> Result<Option<String>, CollabError> {
        let fp = fingerprint(root.der());
        Ok(self.qualified_roots.get(&fp).cloned())
    }
}

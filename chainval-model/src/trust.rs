// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

/// Per-root opt-out flags. `relax` disables both revocation checking on the
/// anchor and strict Basic-Constraints enforcement for it; the spec
/// preserves this as a single opaque boolean rather than splitting it into
/// finer-grained flags (see `DESIGN.md`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustAnchorFlags {
    pub relax: bool,
}

/// `Agent::isTrusted`'s verdict for a candidate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    Trusted,
    NotTrusted,
    /// Any other collaborator failure (I/O error, malformed trust list,
    /// etc); distinct from `NotTrusted` because it's handled as a trust-list
    /// failure (fatal) rather than an interactive-prompt opportunity.
    Error(String),
}

/// `(verdict, flags)` pair returned by `Agent::isTrusted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCaFlags {
    pub decision: TrustDecision,
    pub anchor_flags: TrustAnchorFlags,
}

/// Outcome of `Agent::markTrustedInteractive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkTrustedOutcome {
    Trusted,
    NotSupported,
    Cancelled,
}

/// Outcome of `Agent::isInQualifiedList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifiedListLookup {
    Found,
    NotFound,
}

/// `QualifiedSigClassifier`'s running decision for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualified {
    Unknown,
    No,
    Yes,
}

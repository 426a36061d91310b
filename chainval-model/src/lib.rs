// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Data model shared by the chain-validation engine and its collaborators:
//! the `CertView` projection, validation request/result types, trust types,
//! and the critical-extension whitelist. No I/O, no parsing, no logging —
//! this crate is the vocabulary everything else in the workspace speaks.

pub mod cert;
pub mod result;
pub mod trust;
pub mod whitelist;

pub use cert::{
    is_root, AuthorityKeyId, BasicConstraints, CertHandle, CertView, Extension, SignatureAlgorithm,
    UserData,
};
pub use result::{
    BufferSink, DiagnosticSink, ErrorKind, Severity, TracingSink, ValidationFlags, ValidationRequest,
    ValidationResult,
};
pub use trust::{
    MarkTrustedOutcome, Qualified, QualifiedListLookup, RootCaFlags, TrustAnchorFlags, TrustDecision,
};
pub use whitelist::{is_whitelisted_critical_ext, CRITICAL_EXT_WHITELIST};

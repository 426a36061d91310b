// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The chain-validation engine: issuer resolution, signature verification,
//! policy/extension/CA-constraint checks, revocation, and the
//! qualified-signature/RegTP classifiers, orchestrated by
//! [`ChainValidator`]. Depends on `chainval-model` for the data model and
//! `chainval-collab` for its external collaborators; depends on nothing
//! that parses DER, performs real cryptography, or owns a logging
//! subscriber.

pub mod ca_constraint;
pub mod chain_validator;
pub mod config;
pub mod critical_ext;
pub mod issuer_resolver;
pub mod policy;
pub mod qualified_sig;
pub mod regtp;
pub mod revocation;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use ca_constraint::{CaConstraintCheck, ChainLen};
pub use chain_validator::ChainValidator;
pub use config::ValidatorConfig;
pub use critical_ext::CriticalExtCheck;
pub use issuer_resolver::IssuerResolver;
pub use policy::PolicyChecker;
pub use qualified_sig::QualifiedSigClassifier;
pub use regtp::RegTpWorkaround;
pub use revocation::RevocationOracle;
pub use session::Session;

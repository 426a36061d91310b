// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::{is_whitelisted_critical_ext, CertHandle, ErrorKind};

/// Every extension marked critical must have an OID on
/// [`chainval_model::CRITICAL_EXT_WHITELIST`]; anything else is an
/// `unsupportedCert`, unconditionally fatal.
pub struct CriticalExtCheck;

impl CriticalExtCheck {
    pub fn check(cert: &CertHandle) -> ErrorKind {
        for ext in cert.extensions() {
            if ext.critical && !is_whitelisted_critical_ext(&ext.oid) {
                return ErrorKind::UnsupportedCert;
            }
        }
        ErrorKind::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chainval_collab::FixtureCert;
    use chainval_model::{BasicConstraints, Extension, SignatureAlgorithm, UserData};

    fn leaf_with_extensions(extensions: Vec<Extension>) -> CertHandle {
        FixtureCert {
            subject_dn: "CN=Leaf".to_string(),
            issuer_dn: "CN=Root".to_string(),
            serial: vec![1],
            not_before: "2020-01-01T00:00:00Z".to_string(),
            not_after: "2030-01-01T00:00:00Z".to_string(),
            extensions,
            authority_key_id: None,
            subject_key_id: None,
            der: b"leaf".to_vec(),
            tbs_bytes: b"leaf".to_vec(),
            signature: Vec::new(),
            spki: Vec::new(),
            signature_algorithm: SignatureAlgorithm::RsaPkcs1Sha256,
            policies: None,
            basic_constraints: Some(BasicConstraints { is_ca: false, path_len: None }),
            can_sign_certs: false,
            user_data: UserData::new(),
        }
        .into_handle()
    }

    #[test]
    fn whitelisted_critical_extension_is_ok() {
        let cert = make_cert("CN=Leaf", "CN=Root", None);
        assert_eq!(CriticalExtCheck::check(&cert), ErrorKind::Ok);
    }

    #[test]
    fn unknown_critical_extension_is_unsupported() {
        let cert = leaf_with_extensions(vec![Extension {
            oid: "1.2.3.4".to_string(),
            critical: true,
            value: Vec::new(),
        }]);
        assert_eq!(CriticalExtCheck::check(&cert), ErrorKind::UnsupportedCert);
    }

    #[test]
    fn known_critical_extension_is_ok() {
        let cert = leaf_with_extensions(vec![Extension {
            oid: "2.5.29.15".to_string(),
            critical: true,
            value: Vec::new(),
        }]);
        assert_eq!(CriticalExtCheck::check(&cert), ErrorKind::Ok);
    }
}

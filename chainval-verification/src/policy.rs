// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::fs;

use chainval_model::{CertHandle, DiagnosticSink, ErrorKind, Severity};

use crate::config::ValidatorConfig;

/// Matches a certificate's `certificatePolicies` extension against an
/// administrator-controlled allow-list file.
///
/// The extension is pre-rendered by `CertView::policies` as newline-delimited
/// `OID:N` (non-critical record) / `OID:C` (critical record) lines — see
/// `chainval_model::CertView::policies` for why this one accessor exists
/// instead of generic extension decoding.
pub struct PolicyChecker<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> PolicyChecker<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, cert: &CertHandle, diag: &mut dyn DiagnosticSink) -> ErrorKind {
        let policies = match cert.policies() {
            Some(p) => p,
            None => return ErrorKind::Ok,
        };

        let any_critical = policies.lines().any(|line| line.ends_with(":C"));

        let policy_file = match &self.config.policy_file {
            None => {
                return if any_critical {
                    ErrorKind::NoPolicyMatch
                } else {
                    ErrorKind::Ok
                };
            }
            Some(p) => p,
        };

        let contents = match fs::read_to_string(policy_file) {
            Ok(c) => c,
            Err(e) => {
                if any_critical {
                    return ErrorKind::NoPolicyMatch;
                }
                diag.emit(
                    Severity::Info,
                    "policy_file_unavailable",
                    &format!("{}: {e}", policy_file.display()),
                );
                return ErrorKind::Ok;
            }
        };

        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let oid_end = trimmed
                .find([' ', ':', '\t'])
                .unwrap_or(trimmed.len());
            let oid = &trimmed[..oid_end];
            if oid.is_empty() {
                return ErrorKind::ConfigError;
            }

            if policy_allows(policies, oid) {
                return ErrorKind::Ok;
            }
        }

        if any_critical {
            ErrorKind::NoPolicyMatch
        } else {
            if self.config.verbose {
                diag.emit(Severity::Info, "no_policy_match", "no critical policy required a match");
            }
            ErrorKind::Ok
        }
    }
}

/// True if `policies` contains a record for `oid`: the text `oid` occurring
/// either at the very start of the string or immediately after a `\n`,
/// immediately followed by `:`.
fn policy_allows(policies: &str, oid: &str) -> bool {
    let needle = format!("{oid}:");
    if policies.starts_with(&needle) {
        return true;
    }
    let marker = format!("\n{needle}");
    policies.contains(&marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainval_collab::FixtureCert;
    use chainval_model::BufferSink;

    fn cert_with_policies(policies: Option<&str>) -> CertHandle {
        FixtureCert {
            subject_dn: "CN=Leaf".to_string(),
            issuer_dn: "CN=Root".to_string(),
            serial: vec![1],
            not_before: "2020-01-01T00:00:00Z".to_string(),
            not_after: "2030-01-01T00:00:00Z".to_string(),
            extensions: Vec::new(),
            authority_key_id: None,
            subject_key_id: None,
            der: b"leaf".to_vec(),
            tbs_bytes: b"leaf".to_vec(),
            signature: Vec::new(),
            spki: Vec::new(),
            signature_algorithm: chainval_model::SignatureAlgorithm::RsaPkcs1Sha256,
            policies: policies.map(str::to_string),
            basic_constraints: None,
            can_sign_certs: false,
            user_data: chainval_model::UserData::new(),
        }
        .into_handle()
    }

    #[test]
    fn no_policy_extension_is_ok() {
        let config = ValidatorConfig::default();
        let checker = PolicyChecker::new(&config);
        let cert = cert_with_policies(None);
        let mut sink = BufferSink::default();
        assert_eq!(checker.check(&cert, &mut sink), ErrorKind::Ok);
    }

    #[test]
    fn critical_policy_without_policy_file_is_no_policy_match() {
        let config = ValidatorConfig::default();
        let checker = PolicyChecker::new(&config);
        let cert = cert_with_policies(Some("1.3.6.1.4.1.99.1:C"));
        let mut sink = BufferSink::default();
        assert_eq!(checker.check(&cert, &mut sink), ErrorKind::NoPolicyMatch);
    }

    #[test]
    fn non_critical_policy_without_policy_file_is_ok() {
        let config = ValidatorConfig::default();
        let checker = PolicyChecker::new(&config);
        let cert = cert_with_policies(Some("1.3.6.1.4.1.99.1:N"));
        let mut sink = BufferSink::default();
        assert_eq!(checker.check(&cert, &mut sink), ErrorKind::Ok);
    }

    #[test]
    fn policy_file_match_is_ok() {
        let dir = std::env::temp_dir().join(format!(
            "chainval-policy-test-{:?}",
            std::thread::current().id()
        ));
        fs::write(&dir, "1.3.6.1.4.1.88\n1.3.6.1.4.1.99.1\n").unwrap();
        let mut config = ValidatorConfig::default();
        config.policy_file = Some(dir.clone());
        let checker = PolicyChecker::new(&config);
        let cert = cert_with_policies(Some("1.3.6.1.4.1.99.1:C"));
        let mut sink = BufferSink::default();
        assert_eq!(checker.check(&cert, &mut sink), ErrorKind::Ok);
        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn policy_file_mismatch_is_no_policy_match() {
        let dir = std::env::temp_dir().join(format!(
            "chainval-policy-test-mismatch-{:?}",
            std::thread::current().id()
        ));
        fs::write(&dir, "1.3.6.1.4.1.88\n").unwrap();
        let mut config = ValidatorConfig::default();
        config.policy_file = Some(dir.clone());
        let checker = PolicyChecker::new(&config);
        let cert = cert_with_policies(Some("1.3.6.1.4.1.99.1:C"));
        let mut sink = BufferSink::default();
        assert_eq!(checker.check(&cert, &mut sink), ErrorKind::NoPolicyMatch);
        let _ = fs::remove_file(&dir);
    }
}

// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use chainval_model::{
    is_root, CertHandle, DiagnosticSink, ErrorKind, Qualified, Severity, TrustDecision, ValidationRequest,
    ValidationResult,
};

use crate::ca_constraint::CaConstraintCheck;
use crate::config::ValidatorConfig;
use crate::critical_ext::CriticalExtCheck;
use crate::issuer_resolver::IssuerResolver;
use crate::policy::PolicyChecker;
use crate::qualified_sig::QualifiedSigClassifier;
use crate::regtp::RegTpWorkaround;
use crate::revocation::RevocationOracle;
use crate::session::Session;

const MAX_DEPTH: u32 = 50;
/// Bound on the bad-signature retry loop, per `SPEC_FULL.md` §9: a cycle in
/// the issuer candidate list (the iterator yielding the same DER image
/// twice) must end the loop, not spin forever.
const MAX_SIGNATURE_RETRIES: usize = 8;

/// Orchestrates every other component in this crate into the validation
/// state machine described in §4.1. This is the one type `chainval-cli`
/// constructs directly; everything else here is a supporting cast it calls
/// into.
pub struct ChainValidator<'a> {
    key_db: &'a dyn chainval_collab::KeyDb,
    dirmngr: &'a dyn chainval_collab::DirMngr,
    agent: &'a dyn chainval_collab::Agent,
    crypto: &'a dyn chainval_collab::CryptoEngine,
    config: &'a ValidatorConfig,
}

impl<'a> ChainValidator<'a> {
    pub fn new(
        key_db: &'a dyn chainval_collab::KeyDb,
        dirmngr: &'a dyn chainval_collab::DirMngr,
        agent: &'a dyn chainval_collab::Agent,
        crypto: &'a dyn chainval_collab::CryptoEngine,
        config: &'a ValidatorConfig,
    ) -> Self {
        Self {
            key_db,
            dirmngr,
            agent,
            crypto,
            config,
        }
    }

    pub fn validate(&self, req: &ValidationRequest, session: &Session, diag: &mut dyn DiagnosticSink) -> ValidationResult {
        if self.config.no_chain_validation && !req.list_mode {
            diag.emit(Severity::Warn, "chain_validation_bypassed", "noChainValidation is set");
            return ValidationResult::ok(None);
        }

        let issuer_resolver = IssuerResolver::new(self.key_db, self.dirmngr, self.config);
        let policy_checker = PolicyChecker::new(self.config);
        let revocation = RevocationOracle::new(self.key_db, self.dirmngr, self.config);
        let regtp = RegTpWorkaround::new(self.key_db, self.agent);

        let mut depth: u32 = 0;
        let mut any_expired = false;
        let mut any_revoked = false;
        let mut any_no_crl = false;
        let mut any_crl_too_old = false;
        let mut any_no_policy_match = false;
        let mut is_qualified = Qualified::Unknown;
        let mut exptime: Option<String> = None;

        let mut subject = req.target.clone();

        loop {
            let subject_dn = subject.subject_dn().to_string();
            let issuer_dn = subject.issuer_dn().to_string();
            if issuer_dn.is_empty() {
                return self.finish(ErrorKind::BadCert, &req.target, is_qualified);
            }
            let subject_is_root = is_root(subject.as_ref());

            let mut root_trust: Option<TrustDecision> = None;
            let mut root_relax = false;
            if subject_is_root {
                match self.agent.is_trusted(&subject) {
                    Ok(flags) => {
                        root_relax = flags.anchor_flags.relax;
                        root_trust = Some(flags.decision);
                    }
                    Err(e) => {
                        diag.emit(Severity::Error, "trust_list_failure", &e.to_string());
                        return self.finish(ErrorKind::General, &req.target, is_qualified);
                    }
                }
            }

            let not_before = subject.not_before().to_string();
            let not_after = subject.not_after().to_string();
            if !not_after.is_empty() {
                exptime = Some(match exptime {
                    Some(cur) if cur <= not_after => cur,
                    _ => not_after.clone(),
                });
            }
            if !not_before.is_empty() && req.now.as_str() < not_before.as_str() {
                return self.finish(ErrorKind::CertTooYoung, &req.target, is_qualified);
            }
            if !not_after.is_empty() && req.now.as_str() > not_after.as_str() {
                if self.config.ignore_expiration {
                    diag.emit(Severity::Warn, "cert_expired_ignored", &subject_dn);
                } else {
                    if self.config.verbose {
                        diag.emit(Severity::Info, "cert_expired", &subject_dn);
                    }
                    any_expired = true;
                }
            }

            if CriticalExtCheck::check(&subject) != ErrorKind::Ok {
                return self.finish(ErrorKind::UnsupportedCert, &req.target, is_qualified);
            }

            if !self.config.no_policy_check {
                match policy_checker.check(&subject, diag) {
                    ErrorKind::Ok => {}
                    ErrorKind::NoPolicyMatch => {
                        if self.config.verbose {
                            diag.emit(Severity::Info, "no_policy_match", &subject_dn);
                        }
                        any_no_policy_match = true;
                    }
                    other => return self.finish(other, &req.target, is_qualified),
                }
            }

            if subject_is_root {
                let trust_rc = root_trust.expect("queried above");

                if !matches!(trust_rc, TrustDecision::Trusted) {
                    match self
                        .crypto
                        .verify_signature(subject.spki(), subject.tbs_bytes(), subject.signature(), subject.signature_algorithm())
                    {
                        Ok(()) => {}
                        Err(_) => {
                            let kind = if depth == 0 { ErrorKind::BadCert } else { ErrorKind::BadCertChain };
                            return self.finish(kind, &req.target, is_qualified);
                        }
                    }
                }

                if !root_relax {
                    if CaConstraintCheck::allowed_ca(&subject, &regtp).is_err() {
                        let kind = if depth == 0 { ErrorKind::BadCert } else { ErrorKind::BadCertChain };
                        return self.finish(kind, &req.target, is_qualified);
                    }
                }

                if is_qualified == Qualified::Unknown {
                    is_qualified = QualifiedSigClassifier::classify_root(&subject, self.agent);
                }

                let mut trusted_resolved = matches!(trust_rc, TrustDecision::Trusted);
                match &trust_rc {
                    TrustDecision::Trusted => {}
                    TrustDecision::NotTrusted => {
                        diag.emit(Severity::Warn, "not_trusted", &subject_dn);
                        let fp = chainval_collab::fingerprint(subject.der());
                        let may_prompt = !any_expired
                            && !session.prompts_disabled()
                            && (!req.list_mode || !session.already_asked(fp));
                        if may_prompt {
                            match self.agent.mark_trusted_interactive(&subject) {
                                Ok(chainval_model::MarkTrustedOutcome::Trusted) => trusted_resolved = true,
                                Ok(chainval_model::MarkTrustedOutcome::NotSupported)
                                | Ok(chainval_model::MarkTrustedOutcome::Cancelled) => {
                                    session.disable_prompts();
                                }
                                Err(e) => {
                                    diag.emit(Severity::Error, "mark_trusted_failed", &e.to_string());
                                }
                            }
                            session.record_asked(fp);
                        }
                        if !trusted_resolved {
                            return self.finish(ErrorKind::NotTrusted, &req.target, is_qualified);
                        }
                    }
                    TrustDecision::Error(msg) => {
                        diag.emit(Severity::Error, "trust_list_failure", msg);
                        return self.finish(ErrorKind::General, &req.target, is_qualified);
                    }
                }

                if !req.flags.skip_revocation && !self.config.no_trusted_cert_crl_check && !root_relax {
                    let rk = revocation.is_still_valid(&subject, &subject, req.flags.use_ocsp, diag);
                    self.apply_soft(rk, diag, &mut any_expired, &mut any_revoked, &mut any_no_crl, &mut any_crl_too_old);
                }

                QualifiedSigClassifier::cache_on_target(&req.target, is_qualified);

                let final_kind =
                    Self::collapse(any_expired, any_revoked, any_no_crl, any_crl_too_old, any_no_policy_match);
                return ValidationResult {
                    error_kind: final_kind,
                    nearest_not_after: exptime,
                };
            }

            // Non-root: ascend towards an issuer.
            depth += 1;
            if depth > MAX_DEPTH {
                return self.finish(ErrorKind::BadCertChain, &req.target, is_qualified);
            }

            let candidates = issuer_resolver.candidates(&subject, &issuer_dn, false);
            if candidates.is_empty() {
                return self.finish(ErrorKind::MissingCert, &req.target, is_qualified);
            }

            let mut issuer_idx = 0;
            let mut tries = 0;
            let issuer = loop {
                let candidate = &candidates[issuer_idx];
                match self.crypto.verify_signature(
                    candidate.spki(),
                    subject.tbs_bytes(),
                    subject.signature(),
                    subject.signature_algorithm(),
                ) {
                    Ok(()) => break candidate.clone(),
                    Err(_) => {
                        tries += 1;
                        let next_idx = issuer_idx + 1;
                        let has_distinct_next =
                            next_idx < candidates.len() && candidates[next_idx].der() != candidate.der();
                        if !has_distinct_next || tries >= MAX_SIGNATURE_RETRIES {
                            return self.finish(ErrorKind::BadCertChain, &req.target, is_qualified);
                        }
                        issuer_idx = next_idx;
                    }
                }
            };

            // Resolved once per issuer, per the "single predicate" factoring
            // noted in `SPEC_FULL.md` §9 for root-revocation gating.
            let issuer_root_trust = if is_root(issuer.as_ref()) {
                self.agent.is_trusted(&issuer).ok()
            } else {
                None
            };

            let chain_len = match CaConstraintCheck::allowed_ca(&issuer, &regtp) {
                Ok(cl) => cl,
                Err(()) => {
                    let rescued = issuer_root_trust
                        .as_ref()
                        .is_some_and(|f| matches!(f.decision, TrustDecision::Trusted) && f.anchor_flags.relax);
                    if rescued {
                        None
                    } else {
                        return self.finish(ErrorKind::BadCertChain, &req.target, is_qualified);
                    }
                }
            };

            if let Some(max_len) = chain_len {
                if depth.saturating_sub(1) > max_len {
                    return self.finish(ErrorKind::BadCertChain, &req.target, is_qualified);
                }
            }

            if !req.list_mode && !issuer.can_sign_certs() {
                diag.emit(Severity::Error, "issuer_not_cert_sign_capable", issuer.subject_dn());
                return self.finish(ErrorKind::BadCertChain, &req.target, is_qualified);
            }

            let issuer_relaxed = issuer_root_trust.as_ref().is_some_and(|f| f.anchor_flags.relax);
            if !req.flags.skip_revocation && !issuer_relaxed {
                let rk = revocation.is_still_valid(&subject, &issuer, req.flags.use_ocsp, diag);
                self.apply_soft(rk, diag, &mut any_expired, &mut any_revoked, &mut any_no_crl, &mut any_crl_too_old);
            }

            subject = issuer;
        }
    }

    fn finish(&self, kind: ErrorKind, target: &CertHandle, is_qualified: Qualified) -> ValidationResult {
        QualifiedSigClassifier::cache_on_target(target, is_qualified);
        ValidationResult::fatal(kind)
    }

    fn apply_soft(
        &self,
        kind: ErrorKind,
        diag: &mut dyn DiagnosticSink,
        any_expired: &mut bool,
        any_revoked: &mut bool,
        any_no_crl: &mut bool,
        any_crl_too_old: &mut bool,
    ) {
        let message_key = match kind {
            ErrorKind::CertRevoked => {
                *any_revoked = true;
                Some("cert_revoked")
            }
            ErrorKind::NoCrl => {
                *any_no_crl = true;
                Some("no_crl")
            }
            ErrorKind::CrlTooOld => {
                *any_crl_too_old = true;
                Some("crl_too_old")
            }
            ErrorKind::CertExpired => {
                *any_expired = true;
                Some("cert_expired")
            }
            _ => None,
        };
        if self.config.verbose {
            if let Some(message_key) = message_key {
                diag.emit(Severity::Info, message_key, "soft accumulator set");
            }
        }
    }

    fn collapse(any_expired: bool, any_revoked: bool, any_no_crl: bool, any_crl_too_old: bool, any_no_policy_match: bool) -> ErrorKind {
        [
            Some(ErrorKind::Ok),
            any_no_policy_match.then_some(ErrorKind::NoPolicyMatch),
            any_crl_too_old.then_some(ErrorKind::CrlTooOld),
            any_no_crl.then_some(ErrorKind::NoCrl),
            any_expired.then_some(ErrorKind::CertExpired),
            any_revoked.then_some(ErrorKind::CertRevoked),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(ErrorKind::Ok)
    }
}

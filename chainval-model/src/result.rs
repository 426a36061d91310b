// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::fmt;

use crate::cert::CertHandle;

/// Outcome of a chain validation. Ordered the way the final-verdict priority
/// rule in the spec collapses soft accumulators: `Revoked > Expired > NoCrl >
/// CrlTooOld > NoPolicyMatch > Ok`. The `Ord` impl below encodes exactly that
/// priority so callers can fold multiple soft outcomes with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    Ok,
    NoPolicyMatch,
    CrlTooOld,
    NoCrl,
    CertExpired,
    CertRevoked,
    // Fatal kinds below are never compared for priority (the loop returns as
    // soon as one occurs), but are kept in the same enum because every
    // collaborator call site needs to be able to produce any of them.
    BadCert,
    BadCertChain,
    BadSignature,
    CertTooYoung,
    MissingCert,
    NotTrusted,
    UnsupportedCert,
    ConfigError,
    General,
}

impl ErrorKind {
    pub fn is_fatal(self) -> bool {
        !matches!(
            self,
            ErrorKind::Ok
                | ErrorKind::CertExpired
                | ErrorKind::CertRevoked
                | ErrorKind::NoCrl
                | ErrorKind::CrlTooOld
                | ErrorKind::NoPolicyMatch
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Ok => "ok",
            ErrorKind::BadCert => "bad_cert",
            ErrorKind::BadCertChain => "bad_cert_chain",
            ErrorKind::BadSignature => "bad_signature",
            ErrorKind::CertTooYoung => "cert_too_young",
            ErrorKind::CertExpired => "cert_expired",
            ErrorKind::CertRevoked => "cert_revoked",
            ErrorKind::NoCrl => "no_crl",
            ErrorKind::CrlTooOld => "crl_too_old",
            ErrorKind::NoPolicyMatch => "no_policy_match",
            ErrorKind::MissingCert => "missing_cert",
            ErrorKind::NotTrusted => "not_trusted",
            ErrorKind::UnsupportedCert => "unsupported_cert",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::General => "general",
        };
        f.write_str(s)
    }
}

/// `ValidationRequest.flags`; bit 0 in the source system, a plain field here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationFlags {
    pub skip_revocation: bool,
    /// Per-request OCSP preference, passed down to `RevocationOracle`.
    pub use_ocsp: bool,
}

/// `(targetCert, flags, listMode, outputSink)` from §3, minus the output
/// sink (passed separately to `ChainValidator::validate` so callers can
/// reuse one request across differently-sinked calls) and plus an explicit
/// `now`: rather than reading the system clock internally, the validator
/// takes the current time as an ISO-8601 string, the same way the teacher's
/// own path-validation policy takes an explicit `validation_time` rather
/// than sampling the clock itself.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub target: CertHandle,
    pub flags: ValidationFlags,
    pub list_mode: bool,
    pub now: String,
}

/// Result of a `ChainValidator::validate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub error_kind: ErrorKind,
    /// Earliest `notAfter` seen among all chain members visited, in ISO-8601
    /// form, or `None` if no certificate in the chain carried one.
    pub nearest_not_after: Option<String>,
}

impl ValidationResult {
    pub fn ok(nearest_not_after: Option<String>) -> Self {
        Self {
            error_kind: ErrorKind::Ok,
            nearest_not_after,
        }
    }

    pub fn fatal(kind: ErrorKind) -> Self {
        debug_assert!(kind.is_fatal());
        Self {
            error_kind: kind,
            nearest_not_after: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_kind == ErrorKind::Ok
    }
}

/// Severity used when routing a diagnostic line through [`DiagnosticSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Where diagnostic lines go. In `listMode` the spec wants them bracketed and
/// written to the caller-supplied sink; otherwise they go through the
/// logger. Both paths are modelled as `DiagnosticSink` implementations so the
/// validator's call sites don't need to know which mode they're in.
pub trait DiagnosticSink: Send {
    fn emit(&mut self, severity: Severity, message_key: &str, detail: &str);
}

/// A sink that writes bracketed `[message_key] detail` lines to an in-memory
/// buffer, for `listMode` callers (and tests) that want to inspect the
/// diagnostic trail directly instead of going through `tracing`.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl DiagnosticSink for BufferSink {
    fn emit(&mut self, _severity: Severity, message_key: &str, detail: &str) {
        self.lines.push(format!("[{message_key}] {detail}"));
    }
}

/// A sink that forwards every line to `tracing`, for non-list-mode callers.
/// This is the default the CLI wires up outside of `--list-mode`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, severity: Severity, message_key: &str, detail: &str) {
        match severity {
            Severity::Info => tracing::info!(message_key, detail),
            Severity::Warn => tracing::warn!(message_key, detail),
            Severity::Error => tracing::error!(message_key, detail),
        }
    }
}

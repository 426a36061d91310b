// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::path::PathBuf;

/// The administrator-controlled knobs the validator consults. Every field
/// here corresponds to one of the config options named in the engine's
/// external-interfaces section; `Default` gives the strictest behaviour
/// (nothing skipped, nothing relaxed).
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Global bypass: if set and the request isn't in list mode, `validate`
    /// logs a warning and returns `Ok` immediately without looking at the
    /// chain at all. Exists for emergency operational override; treat it
    /// with the suspicion that implies.
    pub no_chain_validation: bool,

    /// Skip `PolicyChecker` entirely.
    pub no_policy_check: bool,

    /// Path to the administrator policy file consulted by `PolicyChecker`.
    /// `None` means "no policy file configured", which is itself a
    /// meaningful state distinct from "file configured but missing" (see
    /// `chainval-verification::policy`).
    pub policy_file: Option<PathBuf>,

    /// Skip CRL/OCSP checking everywhere except where `use_ocsp` is
    /// requested per-call.
    pub no_crl_check: bool,

    /// Skip revocation checking specifically for trusted roots.
    pub no_trusted_cert_crl_check: bool,

    /// Allow the issuer resolver to fall back to an external directory
    /// lookup when local/ephemeral search comes up empty.
    pub auto_issuer_key_retrieve: bool,

    /// Treat an expired certificate as a logged warning instead of a soft
    /// `certExpired` accumulator.
    pub ignore_expiration: bool,

    /// Emit `info`-level diagnostics for soft accumulator transitions, not
    /// just fatal errors.
    pub verbose: bool,
}

// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! TOML config-file loading, overlaid by `clap`-parsed CLI flags per
//! `SPEC_FULL.md` §10.4: file defaults, flags override.

use std::path::{Path, PathBuf};

use chainval_verification::ValidatorConfig;
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub no_chain_validation: bool,
    pub no_policy_check: bool,
    pub policy_file: Option<PathBuf>,
    pub no_crl_check: bool,
    pub no_trusted_cert_crl_check: bool,
    pub auto_issuer_key_retrieve: bool,
    pub ignore_expiration: bool,
    pub verbose: bool,
}

pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig, CliError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| CliError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Overlays the boolean CLI switches on top of `file`: a switch that's set
/// forces `true`, matching `--skip-revocation`-style "flags only ever turn
/// things on" conventions; anything not passed on the command line falls
/// through to whatever the file said (or `false` by default).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub no_chain_validation: bool,
    pub no_policy_check: bool,
    pub policy_file: Option<PathBuf>,
    pub no_crl_check: bool,
    pub no_trusted_cert_crl_check: bool,
    pub auto_issuer_key_retrieve: bool,
    pub ignore_expiration: bool,
    pub verbose: bool,
}

pub fn build_validator_config(file: FileConfig, overrides: CliOverrides) -> ValidatorConfig {
    ValidatorConfig {
        no_chain_validation: file.no_chain_validation || overrides.no_chain_validation,
        no_policy_check: file.no_policy_check || overrides.no_policy_check,
        policy_file: overrides.policy_file.or(file.policy_file),
        no_crl_check: file.no_crl_check || overrides.no_crl_check,
        no_trusted_cert_crl_check: file.no_trusted_cert_crl_check || overrides.no_trusted_cert_crl_check,
        auto_issuer_key_retrieve: file.auto_issuer_key_retrieve || overrides.auto_issuer_key_retrieve,
        ignore_expiration: file.ignore_expiration || overrides.ignore_expiration,
        verbose: file.verbose || overrides.verbose,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins_over_file_default() {
        let file = FileConfig {
            no_crl_check: false,
            ..Default::default()
        };
        let overrides = CliOverrides {
            no_crl_check: true,
            ..Default::default()
        };
        let config = build_validator_config(file, overrides);
        assert!(config.no_crl_check);
    }

    #[test]
    fn file_value_survives_when_no_override_given() {
        let file = FileConfig {
            ignore_expiration: true,
            ..Default::default()
        };
        let config = build_validator_config(file, CliOverrides::default());
        assert!(config.ignore_expiration);
    }

    #[test]
    fn missing_config_file_path_yields_defaults() {
        let config = load_file_config(None).unwrap();
        assert!(!config.verbose);
    }
}

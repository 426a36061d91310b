// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

/// OIDs that `CriticalExtCheck` will accept as critical. Kept as a plain data
/// table rather than match-arm code, per the source system's own design
/// note, so that new whitelisted OIDs can be added without touching the
/// checker.
pub const CRITICAL_EXT_WHITELIST: &[&str] = &[
    "2.5.29.15", // keyUsage
    "2.5.29.19", // basicConstraints
    "2.5.29.32", // certificatePolicies
    "2.5.29.37", // extendedKeyUsage
];

pub fn is_whitelisted_critical_ext(oid: &str) -> bool {
    CRITICAL_EXT_WHITELIST.contains(&oid)
}

// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use std::sync::Mutex;

/// Replaces the source system's process-wide `AskedTrustedSet` global. A
/// `Session` is built once by the calling process and threaded through every
/// `ChainValidator::validate` call explicitly (see `SPEC_FULL.md` §9); it
/// tracks which roots the user was already prompted to trust, and whether
/// further interactive prompts have been disabled for this session (because
/// a previous prompt came back `NotSupported`/`Cancelled`).
///
/// Internally mutexed so that validations sharing one `Session` concurrently
/// are safe; the intended deployment still runs one validation at a time
/// per process, but nothing here requires that.
#[derive(Default)]
pub struct Session {
    asked: Mutex<AskedState>,
}

#[derive(Default)]
struct AskedState {
    fingerprints: std::collections::HashSet<[u8; 20]>,
    prompts_disabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_asked(&self, fingerprint: [u8; 20]) -> bool {
        self.asked.lock().unwrap().fingerprints.contains(&fingerprint)
    }

    pub fn record_asked(&self, fingerprint: [u8; 20]) {
        self.asked.lock().unwrap().fingerprints.insert(fingerprint);
    }

    pub fn prompts_disabled(&self) -> bool {
        self.asked.lock().unwrap().prompts_disabled
    }

    pub fn disable_prompts(&self) {
        self.asked.lock().unwrap().prompts_disabled = true;
    }
}

//! Session identifier generation.
//!
//! Parsing and validation live on [`SessionId`] itself; this module owns
//! the stateful side: deriving code pairs from names and drawing a numeric
//! segment that avoids every identifier already seen in this process.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;

use atria_core::models::session_id::SessionId;

use crate::error::CodecError;

const NUMBER_RANGE: RangeInclusive<u16> = 100..=999;

/// Random draws before giving up and scanning the range linearly.
const RANDOM_ATTEMPTS: usize = 64;

#[derive(Debug, Default)]
pub struct SessionIdGenerator {
    used: HashSet<SessionId>,
}

impl SessionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the used-id set, e.g. from the repository's index or a remote
    /// known-identifiers list, so regeneration avoids colliding with
    /// sessions already on durable storage.
    pub fn register_known_ids(&mut self, ids: impl IntoIterator<Item = SessionId>) {
        self.used.extend(ids);
    }

    /// Derive a fresh identifier from the clinician and subject names.
    /// Fails with [`CodecError::IdSpaceExhausted`] only once all 900
    /// numeric slots for the derived code pair are taken.
    pub fn generate(
        &mut self,
        clinician_name: &str,
        subject_name: &str,
    ) -> Result<SessionId, CodecError> {
        let clinician_code = derive_code(clinician_name, false);
        let subject_code = derive_code(subject_name, true);

        let mut rng = rand::thread_rng();
        for _ in 0..RANDOM_ATTEMPTS {
            let candidate =
                SessionId::from_parts(&clinician_code, &subject_code, rng.gen_range(NUMBER_RANGE));
            if self.claim(&candidate) {
                return Ok(candidate);
            }
        }

        // Random search gave up, so the space for this pair is crowded.
        for number in NUMBER_RANGE {
            let candidate = SessionId::from_parts(&clinician_code, &subject_code, number);
            if self.claim(&candidate) {
                return Ok(candidate);
            }
        }

        Err(CodecError::IdSpaceExhausted {
            prefix: format!("{clinician_code}-{subject_code}"),
        })
    }

    fn claim(&mut self, candidate: &SessionId) -> bool {
        if self.used.contains(candidate) {
            return false;
        }
        self.used.insert(candidate.clone());
        true
    }
}

/// First three usable characters of a name, uppercased and padded with
/// `X`. Clinician codes take letters only; subject codes also accept
/// digits, matching the identifier grammar. A blank name yields `XXX`.
fn derive_code(name: &str, allow_digits: bool) -> String {
    let mut code: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || (allow_digits && c.is_ascii_digit()))
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while code.len() < 3 {
        code.push('X');
    }
    code
}

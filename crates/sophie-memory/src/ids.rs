// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monotonic, timestamp-derived memory ids.

use chrono::{DateTime, Utc};

use crate::types::MemoryId;

/// Hands out strictly increasing ids.
///
/// Two ids minted in the same microsecond, or while the wall clock runs
/// backwards, share the timestamp of the previous id and bump the sequence.
/// The sequence is padded to the full `u32` width so string order always
/// matches creation order.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<(i64, u32)>,
}

impl IdGenerator {
    /// Starts after `latest`, the greatest id already persisted (if any).
    pub fn seeded(latest: Option<&str>) -> Self {
        Self {
            last: latest.and_then(parse),
        }
    }

    /// Mints the next id for a memory created at `now`.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> MemoryId {
        let micros = now.timestamp_micros().max(0);
        let (micros, seq) = match self.last {
            Some((last, seq)) if micros <= last => match seq.checked_add(1) {
                Some(seq) => (last, seq),
                None => (last + 1, 0),
            },
            _ => (micros, 0),
        };
        self.last = Some((micros, seq));
        MemoryId(format!("{micros:020}-{seq:010}"))
    }
}

fn parse(id: &str) -> Option<(i64, u32)> {
    let (micros, seq) = id.split_once('-')?;
    Some((micros.parse().ok()?, seq.parse().ok()?))
}

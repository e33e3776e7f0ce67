//! Identifier generation.
//!
//! A backend declares one [`IdStrategy`] and the directory builds a single
//! [`IdGenerator`] from it, so ids of different shapes never mix within one
//! dataset.

use super::types::{Contact, ContactId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// How new contact ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// One more than the highest id present or ever issued. Base value 1.
    Sequential,
    /// Unix time in milliseconds, bumped past every id present or issued.
    Timestamp,
    /// 12-byte object id rendered as 24 hex characters.
    ObjectId,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::ObjectId => f.write_str("object-id"),
        }
    }
}

/// Native identifier of the document backend.
///
/// Layout: 4-byte big-endian seconds, 5 process-random bytes, 3-byte counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    #[expect(clippy::big_endian_bytes, reason = "ObjectId fields are stored big-endian")]
    #[must_use]
    pub fn from_parts(seconds: u32, random: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        let (secs, rest) = bytes.split_at_mut(4);
        secs.copy_from_slice(&seconds.to_be_bytes());
        let (rand, count) = rest.split_at_mut(5);
        rand.copy_from_slice(&random);
        let counter = counter.to_be_bytes();
        if let Some(low) = counter.get(1..) {
            count.copy_from_slice(low);
        }
        Self(bytes)
    }

    /// Parse a 24-character hex string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 24 {
            return None;
        }
        let bytes = hex::decode(s).ok()?;
        let bytes: [u8; 12] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation time encoded in the id, in Unix seconds.
    #[expect(clippy::big_endian_bytes, reason = "ObjectId fields are stored big-endian")]
    #[must_use]
    pub fn seconds(&self) -> u32 {
        let [a, b, c, d, ..] = self.0;
        u32::from_be_bytes([a, b, c, d])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Produces ids that are never equal to any id currently present and never
/// repeat an id this generator already issued.
#[derive(Debug)]
pub struct IdGenerator {
    strategy: IdStrategy,
    issued: AtomicU64,
    random: [u8; 5],
    counter: AtomicU32,
}

impl IdGenerator {
    #[expect(clippy::big_endian_bytes, reason = "ObjectId fields are stored big-endian")]
    #[must_use]
    pub fn new(strategy: IdStrategy) -> Self {
        let seed = uuid::Uuid::new_v4().into_bytes();
        let [r0, r1, r2, r3, r4, c0, c1, c2, ..] = seed;
        Self {
            strategy,
            issued: AtomicU64::new(0),
            random: [r0, r1, r2, r3, r4],
            counter: AtomicU32::new(u32::from_be_bytes([0, c0, c1, c2])),
        }
    }

    #[must_use]
    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Next id given the current snapshot of the directory.
    pub fn next_id(&self, existing: &[Contact]) -> ContactId {
        match self.strategy {
            IdStrategy::Sequential => {
                let floor = max_numeric_id(existing).saturating_add(1);
                ContactId::new(self.issue_at_least(floor).to_string())
            }
            IdStrategy::Timestamp => {
                let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
                let floor = now.max(max_numeric_id(existing).saturating_add(1));
                ContactId::new(self.issue_at_least(floor).to_string())
            }
            IdStrategy::ObjectId => self.next_object_id(existing),
        }
    }

    /// Record `floor` or one past the last issued value, whichever is larger.
    fn issue_at_least(&self, floor: u64) -> u64 {
        let mut current = self.issued.load(Ordering::SeqCst);
        loop {
            let next = floor.max(current.saturating_add(1));
            match self
                .issued
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    fn next_object_id(&self, existing: &[Contact]) -> ContactId {
        let seconds = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        loop {
            let counter = self.counter.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;
            let id = ContactId::new(ObjectId::from_parts(seconds, self.random, counter).to_hex());
            if !existing.iter().any(|c| c.id == id) {
                return id;
            }
        }
    }
}

fn max_numeric_id(existing: &[Contact]) -> u64 {
    existing
        .iter()
        .filter_map(|c| c.id.as_number())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn contact(id: &str) -> Contact {
        Contact {
            id: ContactId::from(id),
            name: format!("Person {id}"),
            number: "040-123456".to_string(),
        }
    }

    #[test]
    fn test_sequential_starts_at_one() {
        let generator = IdGenerator::new(IdStrategy::Sequential);
        assert_eq!(generator.next_id(&[]).as_str(), "1");
    }

    #[test]
    fn test_sequential_is_max_plus_one() {
        let generator = IdGenerator::new(IdStrategy::Sequential);
        let existing = vec![contact("1"), contact("7"), contact("3")];
        assert_eq!(generator.next_id(&existing).as_str(), "8");
    }

    #[test]
    fn test_sequential_never_reuses_after_delete() {
        let generator = IdGenerator::new(IdStrategy::Sequential);
        let mut existing = vec![contact("1"), contact("2")];
        let third = generator.next_id(&existing);
        assert_eq!(third.as_str(), "3");

        // The highest record is deleted before the next create
        existing.retain(|c| c.id.as_str() != "2");
        let fourth = generator.next_id(&existing);
        assert_eq!(fourth.as_str(), "4");
    }

    #[test]
    fn test_timestamp_is_unique_within_same_millisecond() {
        let generator = IdGenerator::new(IdStrategy::Timestamp);
        let a = generator.next_id(&[]);
        let b = generator.next_id(&[]);
        assert_ne!(a, b);
        assert!(b.as_number().unwrap() > a.as_number().unwrap());
    }

    #[test]
    fn test_timestamp_skips_past_existing_ids() {
        let generator = IdGenerator::new(IdStrategy::Timestamp);
        let future = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap() + 1_000_000;
        let existing = vec![contact(&future.to_string())];
        let id = generator.next_id(&existing);
        assert_eq!(id.as_number(), Some(future + 1));
    }

    #[test]
    fn test_object_id_shape() {
        let generator = IdGenerator::new(IdStrategy::ObjectId);
        let id = generator.next_id(&[]);
        assert_eq!(id.as_str().len(), 24);
        assert!(ObjectId::parse(id.as_str()).is_some());
    }

    #[test]
    fn test_object_ids_are_distinct() {
        let generator = IdGenerator::new(IdStrategy::ObjectId);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generator.next_id(&[])));
        }
    }

    #[test]
    fn test_object_id_roundtrip_and_seconds() {
        let oid = ObjectId::from_parts(0x6501_0203, [1, 2, 3, 4, 5], 0x00AB_CDEF);
        assert_eq!(oid.to_hex(), "650102030102030405abcdef");
        assert_eq!(ObjectId::parse(&oid.to_hex()), Some(oid));
        assert_eq!(oid.seconds(), 0x6501_0203);
    }

    #[test]
    fn test_object_id_parse_rejects_bad_input() {
        assert!(ObjectId::parse("1").is_none());
        assert!(ObjectId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(ObjectId::parse("650102030102030405abcdef00").is_none());
    }

    #[test]
    fn test_strategy_serde_names() {
        let s: IdStrategy = serde_json::from_str("\"object-id\"").unwrap();
        assert_eq!(s, IdStrategy::ObjectId);
    }
}

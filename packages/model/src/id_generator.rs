use crc32fast::Hasher;

/// Source of fresh entity ids (blocks, columns, pages)
///
/// Factories take `&mut dyn IdSource` instead of reading the clock, so
/// callers decide how ids are minted and tests can use fixed seeds.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Hash a session label into a short hex seed using CRC32
pub fn session_seed(label: &str) -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();

    let mut hasher = Hasher::new();
    hasher.update(label.as_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator scoped to one editing session
///
/// Ids are `<seed>-<n>` where `n` is a monotonic counter, so any number of
/// ids minted in the same instant are still pairwise distinct.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    /// Create a generator with a seed derived from `label`, the current
    /// time and the process id
    pub fn new(label: &str) -> Self {
        Self::from_seed(session_seed(label))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids minted so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> String {
        self.new_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("abc");

        assert_eq!(gen.new_id(), "abc-1");
        assert_eq!(gen.new_id(), "abc-2");
        assert_eq!(gen.next_id(), "abc-3");
        assert_eq!(gen.count(), 3);
    }

    #[test]
    fn test_ids_unique_within_one_batch() {
        let mut gen = IdGenerator::new("editor");
        let ids: HashSet<String> = (0..1000).map(|_| gen.new_id()).collect();
        assert_eq!(ids.len(), 1000);

        let seed = gen.seed().to_string();
        assert!(ids.iter().all(|id| id.starts_with(&seed)));
    }

    #[test]
    fn test_label_changes_seed() {
        let a = IdGenerator::new("session-a");
        let b = IdGenerator::new("session-b");
        assert_ne!(a.seed(), b.seed());
    }
}

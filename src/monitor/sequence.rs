use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide source of default filename sequence numbers.
/// Numbers are never reused for the life of the generator.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Read-and-increment
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequence_is_monotonic() {
        let seq = SequenceGenerator::starting_at(7);
        assert_eq!(seq.next_id(), 7);
        assert_eq!(seq.next_id(), 8);
        assert_eq!(seq.next_id(), 9);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let seq = SequenceGenerator::new();
        let ids: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (0..500).map(|_| seq.next_id()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 4000);
        assert_eq!(seq.next_id(), 4000);
    }
}

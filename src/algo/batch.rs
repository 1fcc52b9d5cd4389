//! Diffing many independent pairs at once.
//!
//! Each pair is a separate diff call with no shared state, so pairs can run
//! in parallel. With the `parallel` feature the pairs are spread over the
//! rayon thread pool; without it they run one after another.

use crate::core::Diffable;

use super::diff::{diff_with_config, DiffConfig, DiffResult};

/// Diff every `(old, new)` pair; results keep the input order.
pub fn diff_batch<D>(pairs: &[(&[D], &[D])], config: DiffConfig) -> Vec<DiffResult<usize>>
where
    D: Diffable + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        pairs
            .par_iter()
            .map(|&(old, new)| diff_with_config(old, new, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter()
            .map(|&(old, new)| diff_with_config(old, new, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::Operation;
    use crate::id::DiffId;

    struct Key(u32);

    impl Diffable for Key {
        fn diff_id(&self) -> DiffId {
            DiffId::from(self.0)
        }

        fn should_update(&self, _other: &Self) -> bool {
            false
        }
    }

    fn keys(ids: &[u32]) -> Vec<Key> {
        ids.iter().map(|&id| Key(id)).collect()
    }

    #[test]
    fn test_batch_preserves_order() {
        let (a_old, a_new) = (keys(&[1, 2]), keys(&[2]));
        let (b_old, b_new) = (keys(&[]), keys(&[7]));
        let (c_old, c_new) = (keys(&[1, 2, 3]), keys(&[2, 1, 3]));

        let pairs = [
            (a_old.as_slice(), a_new.as_slice()),
            (b_old.as_slice(), b_new.as_slice()),
            (c_old.as_slice(), c_new.as_slice()),
        ];
        let results = diff_batch(&pairs, DiffConfig::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].operations, vec![Operation::Delete(0)]);
        assert_eq!(results[1].operations, vec![Operation::Insert(0)]);
        assert_eq!(results[2].operations, vec![Operation::Move(0, 1)]);
    }

    #[test]
    fn test_empty_batch() {
        let pairs: Vec<(&[Key], &[Key])> = Vec::new();
        assert!(diff_batch(&pairs, DiffConfig::default()).is_empty());
    }
}

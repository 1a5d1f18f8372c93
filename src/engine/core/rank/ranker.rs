use std::cmp::Ordering;

use crate::engine::errors::ConfigurationError;

/// An entity with its ordering value and assigned quantile bucket (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity<T> {
    pub entity: T,
    pub value: Option<f64>,
    pub bucket: usize,
}

/// NTILE-style bucket assignment.
///
/// Entities are sorted by value descending, absent values last, ties broken
/// by entity ascending. With `n` entities and `k` buckets the first `n % k`
/// buckets hold one extra member; bucket 1 holds the highest values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    buckets: usize,
}

impl Ranker {
    pub fn new(buckets: usize) -> Result<Self, ConfigurationError> {
        if buckets == 0 {
            return Err(ConfigurationError::InvalidBucketCount);
        }
        Ok(Self { buckets })
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// One-shot form of `Ranker::new(k)?.assign(entries)`.
    pub fn ntile<T: Ord>(
        entries: Vec<(T, Option<f64>)>,
        buckets: usize,
    ) -> Result<Vec<RankedEntity<T>>, ConfigurationError> {
        Ok(Self::new(buckets)?.assign(entries))
    }

    /// Returns entities in rank order with their buckets.
    pub fn assign<T: Ord>(&self, mut entries: Vec<(T, Option<f64>)>) -> Vec<RankedEntity<T>> {
        entries.sort_by(|(ea, va), (eb, vb)| rank_order(*va, *vb).then_with(|| ea.cmp(eb)));

        let n = entries.len();
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (entity, value))| RankedEntity {
                entity,
                value,
                bucket: bucket_for(i, n, self.buckets),
            })
            .collect()
    }
}

fn rank_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Bucket of the entity at sorted position `index` among `n`.
#[inline]
pub(crate) fn bucket_for(index: usize, n: usize, k: usize) -> usize {
    let base = n / k;
    let extra = n % k;
    let large = extra * (base + 1);
    if index < large {
        index / (base + 1) + 1
    } else {
        // index >= large implies base > 0
        extra + (index - large) / base + 1
    }
}

use std::collections::HashSet;

use crate::engine::errors::ConfigurationError;

/// Hard ceiling on grouping dimensions; masks are `u32` and CUBE is 2^n.
pub const MAX_GROUPING_DIMENSIONS: usize = 16;

/// How the dimension list expands into grouping sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingMode {
    /// GROUPING SETS: caller-supplied subsets, used as given
    Explicit(Vec<Vec<String>>),
    /// Hierarchical prefixes, most detailed first
    Rollup,
    /// Full power set
    Cube,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingSetSpec {
    dimensions: Vec<String>,
    mode: GroupingMode,
}

impl GroupingSetSpec {
    pub fn new(dimensions: Vec<String>, mode: GroupingMode) -> Self {
        Self { dimensions, mode }
    }

    pub fn rollup(dimensions: &[&str]) -> Self {
        Self::new(to_owned(dimensions), GroupingMode::Rollup)
    }

    pub fn cube(dimensions: &[&str]) -> Self {
        Self::new(to_owned(dimensions), GroupingMode::Cube)
    }

    pub fn explicit(dimensions: &[&str], sets: &[&[&str]]) -> Self {
        Self::new(
            to_owned(dimensions),
            GroupingMode::Explicit(sets.iter().map(|s| to_owned(s)).collect()),
        )
    }

    /// Plain GROUP BY: a single grouping set holding every dimension.
    pub fn group_by(dimensions: &[&str]) -> Self {
        Self::explicit(dimensions, &[dimensions])
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn mode(&self) -> &GroupingMode {
        &self.mode
    }

    /// Validates the dimension list and expands it into ordered grouping sets.
    pub fn enumerate(&self, max_dimensions: usize) -> Result<GroupingSets, ConfigurationError> {
        let n = self.dimensions.len();
        if n == 0 {
            return Err(ConfigurationError::EmptyDimensions);
        }
        let max = max_dimensions.min(MAX_GROUPING_DIMENSIONS);
        if n > max {
            return Err(ConfigurationError::TooManyDimensions { count: n, max });
        }
        let mut seen = HashSet::with_capacity(n);
        for d in &self.dimensions {
            if !seen.insert(d.as_str()) {
                return Err(ConfigurationError::DuplicateDimension(d.clone()));
            }
        }

        let sets = match &self.mode {
            GroupingMode::Rollup => (0..=n).rev().map(GroupingSet::prefix).collect(),
            GroupingMode::Cube => (0..(1u32 << n))
                .rev()
                .map(|mask| GroupingSet { mask })
                .collect(),
            GroupingMode::Explicit(subsets) => self.explicit_sets(subsets)?,
        };

        Ok(GroupingSets {
            dimension_count: n,
            sets,
        })
    }

    fn explicit_sets(&self, subsets: &[Vec<String>]) -> Result<Vec<GroupingSet>, ConfigurationError> {
        if subsets.is_empty() {
            return Err(ConfigurationError::EmptyExplicitSets);
        }
        let mut out = Vec::with_capacity(subsets.len());
        let mut masks = HashSet::with_capacity(subsets.len());
        for subset in subsets {
            let mut mask = 0u32;
            for name in subset {
                let idx = self
                    .dimensions
                    .iter()
                    .position(|d| d == name)
                    .ok_or_else(|| ConfigurationError::ForeignSubset(name.clone()))?;
                mask |= 1 << idx;
            }
            if !masks.insert(mask) {
                return Err(ConfigurationError::DuplicateSubset(subset.clone()));
            }
            out.push(GroupingSet { mask });
        }
        Ok(out)
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// One subset of the dimension list; bit `i` is set when dimension `i` is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupingSet {
    mask: u32,
}

impl GroupingSet {
    pub fn from_mask(mask: u32) -> Self {
        Self { mask }
    }

    /// The first `len` dimensions
    pub fn prefix(len: usize) -> Self {
        let mask = if len >= 32 { u32::MAX } else { (1u32 << len) - 1 };
        Self { mask }
    }

    #[inline]
    pub fn contains(&self, dimension: usize) -> bool {
        dimension < 32 && self.mask & (1 << dimension) != 0
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_grand_total(&self) -> bool {
        self.mask == 0
    }

    /// SQL `GROUPING_ID`: one bit per dimension, first dimension most
    /// significant, set when the dimension is aggregated away.
    pub fn grouping_id(&self, dimension_count: usize) -> u32 {
        (0..dimension_count).fold(0u32, |id, i| (id << 1) | u32::from(!self.contains(i)))
    }

    pub fn members(&self, dimension_count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..dimension_count).filter(|&i| self.contains(i))
    }
}

/// The ordered expansion of a `GroupingSetSpec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingSets {
    dimension_count: usize,
    sets: Vec<GroupingSet>,
}

impl GroupingSets {
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn dimension_count(&self) -> usize {
        self.dimension_count
    }

    pub fn as_slice(&self) -> &[GroupingSet] {
        &self.sets
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupingSet> {
        self.sets.iter()
    }

    pub fn get(&self, index: usize) -> Option<GroupingSet> {
        self.sets.get(index).copied()
    }

    /// Index of the set with the given grouped-dimension mask
    pub fn index_of_mask(&self, mask: u32) -> Option<usize> {
        self.sets.iter().position(|s| s.mask == mask)
    }
}

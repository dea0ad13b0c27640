use serde::{Deserialize, Serialize};

use crate::domain::Category;
use crate::error::{ModelError, ModelResult};

/// Number of tasks to launch for each category, indexed by category order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts([u32; Category::COUNT]);

impl Counts {
    /// Create counts from a per-category array (`[cat1, cat2, cat3, cat4]`).
    pub const fn new(counts: [u32; Category::COUNT]) -> Self {
        Self(counts)
    }

    /// Count for a single category.
    #[inline]
    pub fn get(&self, category: Category) -> u32 {
        self.0[category.index()]
    }

    /// Total number of tasks a batch launches for these counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// Returns `true` when no task would be launched.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(category, count)` pairs in launch order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::all().map(move |c| (c, self.get(c)))
    }

    /// Raw per-category array.
    pub fn as_array(&self) -> [u32; Category::COUNT] {
        self.0
    }
}

impl From<[u32; Category::COUNT]> for Counts {
    fn from(counts: [u32; Category::COUNT]) -> Self {
        Self(counts)
    }
}

impl TryFrom<&[u32]> for Counts {
    type Error = ModelError;
    fn try_from(values: &[u32]) -> ModelResult<Self> {
        let arr: [u32; Category::COUNT] = values.try_into().map_err(|_| {
            ModelError::Invalid(format!(
                "expected {} counts, got {}",
                Category::COUNT,
                values.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_categories() {
        let counts = Counts::new([2, 0, 3, 1]);
        assert_eq!(counts.total(), 6);
        assert!(!counts.is_empty());
        assert!(Counts::default().is_empty());
    }

    #[test]
    fn iter_follows_category_order() {
        let counts = Counts::new([5, 6, 7, 8]);
        let pairs: Vec<(u8, u32)> = counts.iter().map(|(c, n)| (c.get(), n)).collect();
        assert_eq!(pairs, vec![(1, 5), (2, 6), (3, 7), (4, 8)]);
    }

    #[test]
    fn try_from_slice_requires_four_values() {
        assert!(Counts::try_from(&[1u32, 2, 3][..]).is_err());
        let counts = Counts::try_from(&[1u32, 2, 3, 4][..]).unwrap();
        assert_eq!(counts.as_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn serde_is_a_plain_array() {
        let counts = Counts::new([1, 0, 0, 2]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), "[1,0,0,2]");
    }
}

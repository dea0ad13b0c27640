use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Kind of synthetic task.
///
/// Always within `1..=4`; out-of-range values are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Category(u8);

impl Category {
    /// Smallest valid category.
    pub const MIN: u8 = 1;
    /// Largest valid category.
    pub const MAX: u8 = 4;
    /// Number of categories.
    pub const COUNT: usize = 4;

    /// Create a category, validating the range.
    pub fn new(value: u8) -> ModelResult<Self> {
        Self::try_from(i64::from(value))
    }

    /// Raw category number.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, used to index per-category tables.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    /// All categories in launch order.
    pub fn all() -> impl Iterator<Item = Category> {
        (Self::MIN..=Self::MAX).map(Category)
    }
}

impl TryFrom<i64> for Category {
    type Error = ModelError;
    fn try_from(value: i64) -> ModelResult<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::CategoryOutOfRange(value))
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = ModelError;
    fn try_from(value: u8) -> ModelResult<Self> {
        Self::try_from(i64::from(value))
    }
}

impl From<Category> for u8 {
    fn from(c: Category) -> Self {
        c.0
    }
}

impl FromStr for Category {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let raw = s.parse::<i64>().map_err(|_| ModelError::NotAnInteger {
            field: "category",
            value: s.to_string(),
        })?;
        Self::try_from(raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

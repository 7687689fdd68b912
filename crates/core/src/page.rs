//! Cursor pagination value types.

use serde::{Deserialize, Serialize};

use crate::id::JobId;

/// Number of postings per page.
///
/// Always within `1..=PageSize::MAX`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(20);
    pub const MAX: u32 = 100;

    /// Exact page size; `None` when outside `1..=MAX`.
    pub fn new(size: u32) -> Option<Self> {
        (1..=Self::MAX).contains(&size).then_some(Self(size))
    }

    /// Lenient constructor used at the request boundary: missing or zero falls
    /// back to `fallback`, oversized values are clamped to `MAX`.
    pub fn clamped(requested: Option<i64>, fallback: PageSize) -> Self {
        match requested {
            Some(n) if n >= 1 => Self(n.min(Self::MAX as i64) as u32),
            _ => fallback,
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::new(value).ok_or_else(|| format!("page size must be within 1..={}", PageSize::MAX))
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// One page of the feed.
///
/// `next_cursor` is absent at the end of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<JobId>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

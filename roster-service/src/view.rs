// Search and pagination derivations
// Pure functions over the collection; callers own the page index.

use crate::models::UserRecord;

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

/// Records whose name contains `query`, case-insensitively, in collection order
pub fn filter<'a>(users: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    let query = query.to_lowercase();
    users
        .iter()
        .filter(|user| user.name.to_lowercase().contains(&query))
        .collect()
}

/// Number of pages needed for `len` items; never less than 1
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// The `page`-th (1-based) block of `items`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size.get());
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size.get()).min(items.len());
    &items[start..end]
}

/// Bring `page` into `[1, total]`
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Position within the page range, for drawing Previous / 1..N / Next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current: usize,
    pub total: usize,
}

impl PageWindow {
    pub fn new(current: usize, total: usize) -> Self {
        let total = total.max(1);
        Self {
            current: clamp_page(current, total),
            total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total
    }

    /// A single page needs no controls
    pub fn is_needed(&self) -> bool {
        self.total > 1
    }
}

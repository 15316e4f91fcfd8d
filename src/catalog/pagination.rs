/// Rows shown per page of the sound table.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    max_page: usize,
    page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            max_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn max_page(&self) -> usize {
        self.max_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Re-derives the page count for a collection of `size` items and clamps
    /// the cursor down if it now points past the end.
    pub fn recompute(&mut self, size: usize) {
        let (max_page, adjusted) = recompute(size, self.current_page, self.page_size);
        if adjusted != self.current_page {
            tracing::debug!(
                from = self.current_page,
                to = adjusted,
                max_page,
                "clamped current page after collection change"
            );
        }
        self.max_page = max_page;
        self.current_page = adjusted;
    }

    /// Returns `true` when the cursor moved.
    pub fn change_page(&mut self, requested: i64) -> bool {
        let next = change_page(requested, self.current_page, self.max_page);
        if next == self.current_page {
            return false;
        }
        self.current_page = next;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(self.current_page as i64 + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.change_page(self.current_page as i64 - 1)
    }
}

pub fn max_page(size: usize, page_size: usize) -> usize {
    if size == 0 {
        1
    } else {
        size.div_ceil(page_size.max(1))
    }
}

/// Returns `(max_page, adjusted_page)`. The page is only ever clamped
/// downward.
pub fn recompute(size: usize, current_page: usize, page_size: usize) -> (usize, usize) {
    let max_page = max_page(size, page_size);
    let adjusted = if current_page > max_page {
        max_page
    } else {
        current_page
    };
    (max_page, adjusted)
}

pub fn change_page(requested: i64, current_page: usize, max_page: usize) -> usize {
    if requested == current_page as i64 || requested > max_page as i64 {
        return current_page;
    }
    if requested <= 0 {
        return 1;
    }
    requested as usize
}

/// Keys `[(page-1)*page_size, page*page_size)` of `keys`; empty when the page
/// lies past the end.
pub fn page_slice<T>(keys: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= keys.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(keys.len());
    &keys[start..end]
}

/// The page slice, or every key when the slice comes back empty so a stale
/// cursor never renders a blank table.
pub fn visible_slice<T>(keys: &[T], page: usize, page_size: usize) -> &[T] {
    let slice = page_slice(keys, page, page_size);
    if slice.is_empty() {
        keys
    } else {
        slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_page_is_ceil_of_size_with_floor_of_one() {
        for n in 0..=53usize {
            let expected = std::cmp::max(1, (n + PAGE_SIZE - 1) / PAGE_SIZE);
            assert_eq!(max_page(n, PAGE_SIZE), expected, "size {n}");
        }
    }

    #[test]
    fn recompute_keeps_cursor_in_range() {
        for n in 0..=40usize {
            for current in 1..=10usize {
                let (max, adjusted) = recompute(n, current, PAGE_SIZE);
                assert!(adjusted >= 1 && adjusted <= max, "n={n} current={current}");
            }
        }
    }

    #[test]
    fn recompute_never_moves_cursor_upward() {
        assert_eq!(recompute(30, 2, PAGE_SIZE), (6, 2));
        assert_eq!(recompute(10, 3, PAGE_SIZE), (2, 2));
        assert_eq!(recompute(0, 4, PAGE_SIZE), (1, 1));
    }

    #[test]
    fn change_page_is_idempotent_on_current_page() {
        assert_eq!(change_page(2, 2, 3), 2);
        assert_eq!(change_page(1, 1, 1), 1);
    }

    #[test]
    fn change_page_rejects_pages_past_the_end() {
        assert_eq!(change_page(4, 2, 3), 2);
        assert_eq!(change_page(100, 1, 1), 1);
    }

    #[test]
    fn change_page_floors_non_positive_requests() {
        assert_eq!(change_page(0, 3, 5), 1);
        assert_eq!(change_page(-7, 2, 5), 1);
        assert_eq!(change_page(0, 1, 5), 1);
    }

    #[test]
    fn change_page_accepts_in_range_requests() {
        assert_eq!(change_page(3, 1, 3), 3);
        assert_eq!(change_page(1, 3, 3), 1);
    }

    #[test]
    fn state_navigation_reports_movement() {
        let mut state = PaginationState::default();
        state.recompute(11);
        assert_eq!(state.max_page(), 3);
        assert!(!state.previous_page());
        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.current_page(), 3);
        state.recompute(10);
        assert_eq!((state.current_page(), state.max_page()), (2, 2));
    }

    #[test]
    fn page_slice_windows_keys() {
        let keys: Vec<u32> = (0..11).collect();
        assert_eq!(page_slice(&keys, 1, 5), &[0, 1, 2, 3, 4]);
        assert_eq!(page_slice(&keys, 3, 5), &[10]);
        assert!(page_slice(&keys, 4, 5).is_empty());
    }

    #[test]
    fn visible_slice_falls_back_to_full_list() {
        let keys: Vec<u32> = (0..6).collect();
        assert_eq!(visible_slice(&keys, 2, 5), &[5]);
        assert_eq!(visible_slice(&keys, 9, 5), keys.as_slice());
        let empty: Vec<u32> = Vec::new();
        assert!(visible_slice(&empty, 1, 5).is_empty());
    }
}

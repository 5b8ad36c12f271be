use serde::Serialize;

use crate::domain::page::PageResult;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page numbers to render for a pager, `None` marking a gap.
pub fn page_links(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let current_page = current_page.max(1);
    get_pages(total_pages, current_page, 2, 2, 4, 2)
}

/// Render-ready view of a [`PageResult`].
#[derive(Serialize)]
pub struct PageView<'a, T> {
    pub items: &'a [T],
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_count: usize,
}

impl<'a, T> From<&'a PageResult<T>> for PageView<'a, T> {
    fn from(result: &'a PageResult<T>) -> Self {
        Self {
            items: &result.items,
            pages: page_links(result.total_pages, result.current_page),
            page: result.current_page.max(1),
            total_count: result.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_for_empty_result() {
        assert!(page_links(0, 1).is_empty());
    }

    #[test]
    fn short_ranges_have_no_gaps() {
        assert_eq!(
            page_links(5, 3),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn long_ranges_insert_gaps() {
        assert_eq!(
            page_links(20, 10),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let result: PageResult<u8> = PageResult {
            items: vec![],
            current_page: 0,
            total_pages: 3,
            total_count: 25,
        };
        let view = PageView::from(&result);
        assert_eq!(view.page, 1);
        assert_eq!(view.pages, vec![Some(1), Some(2), Some(3)]);
    }
}

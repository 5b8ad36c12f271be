use serde::Serialize;

/// One page of records as returned by a list source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total_count: usize) -> Self {
        Self {
            items,
            current_page: current_page.max(1),
            total_pages,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 1, 0, 0)
    }
}

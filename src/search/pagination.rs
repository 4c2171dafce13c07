use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page numbers to show as buttons
const MAX_UNCOLLAPSED_PAGES: usize = 7;

/// One entry of the page-button bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "page")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Compact page-button range: every page up to seven pages, otherwise the
/// first and last page around a three-page window with ellipses for gaps.
pub fn page_range(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut pages = vec![PageItem::Page(1)];

    if current > 3 {
        pages.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    pages.extend((start..=end).map(PageItem::Page));

    if current + 2 < total {
        pages.push(PageItem::Ellipsis);
    }

    pages.push(PageItem::Page(total));
    pages
}

/// Fixed-size pages over an ordered list, starting at page 1.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    current_page: usize,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

impl<T> Paginator<T> {
    /// A page size of 0 is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Swaps in a new list and goes back to page 1.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Never less than 1, so an empty list is "page 1 of 1".
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    pub fn current_page_results(&self) -> &[T] {
        let start = ((self.current_page - 1) * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Moves to `page`. Returns `false` without changing anything when the
    /// page is out of range or already current.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn page_range(&self) -> Vec<PageItem> {
        page_range(self.current_page, self.total_pages())
    }
}

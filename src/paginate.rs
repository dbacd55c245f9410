//! Fixed-size pages over an ordered slice.

/// One page of `items`, with the page number already clamped.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// 0-based index of the first item on this page within the full list.
    pub fn offset(&self) -> usize {
        (self.page_number - 1) * self.page_size
    }
}

/// Slice `items` into pages of `page_size` and return page `page_number`.
///
/// Out-of-range page numbers are clamped into `[1, total_pages]`; an empty
/// list yields page 1 of 0 with no items. A `page_size` of 0 is treated
/// as 1.
pub fn paginate<T>(items: &[T], page_number: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let page_number = page_number.clamp(1, total_pages.max(1));
    let offset = (page_number - 1) * page_size;
    let end = (offset + page_size).min(total_items);
    let items = if offset < total_items {
        &items[offset..end]
    } else {
        &items[0..0]
    };

    Page {
        items,
        page_number,
        total_pages,
        total_items,
        page_size,
    }
}

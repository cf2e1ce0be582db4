/// Results shown per page
pub const PAGE_SIZE: usize = 3;

/// One page of a fetched result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> ResultPage<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the first item on this page within the full set
    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// `ceil(count / page_size)`, zero for an empty set or a zero page size
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Pull `page` back into `1..=total_pages` (1 when there are no pages)
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out page `page_number` of `items`
pub fn paginate<T: Clone>(items: &[T], page_number: usize, page_size: usize) -> ResultPage<T> {
    let total_count = items.len();
    let total_pages = total_pages(total_count, page_size);

    let items = if page_number == 0 || page_size == 0 {
        Vec::new()
    } else {
        let start = (page_number - 1).saturating_mul(page_size);
        if start >= total_count {
            Vec::new()
        } else {
            let end = start.saturating_add(page_size).min(total_count);
            items[start..end].to_vec()
        }
    };

    ResultPage {
        items,
        page_number,
        page_size,
        total_pages,
        total_count,
    }
}

/// Request for one page of results.
///
/// Page numbers are 0-based at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Creates a request for page `page` (0-based) holding `size` elements.
    pub fn of(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of elements to skip before this page starts.
    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    number: usize,
    size: usize,
    total_elements: u64,
}

impl<T> Page<T> {
    /// Creates a page for `request` out of `total_elements` matches.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    /// Wraps a complete result set as a single page.
    pub fn unpaged(content: Vec<T>) -> Self {
        let size = content.len();
        Self {
            content,
            number: 0,
            size,
            total_elements: size as u64,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// 0-based index of this page.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of pages needed to hold every match; 1 for an unsized page.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.total_elements.div_ceil(self.size as u64)
        }
    }

    /// Number of elements on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_times_size() {
        assert_eq!(PageRequest::of(0, 5).offset(), 0);
        assert_eq!(PageRequest::of(1, 5).offset(), 5);
        assert_eq!(PageRequest::of(3, 5).offset(), 15);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], PageRequest::of(0, 5), 2);
        assert_eq!(page.total_pages(), 1);

        let page = Page::new(vec![1, 2, 3, 4, 5], PageRequest::of(0, 5), 10);
        assert_eq!(page.total_pages(), 2);

        let page = Page::new(vec![1], PageRequest::of(2, 5), 11);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn unpaged_counts_its_own_content() {
        let page = Page::unpaged(vec!["a", "b", "c"]);
        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.len(), 3);

        let empty: Page<&str> = Page::unpaged(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.total_elements(), 0);
        assert_eq!(empty.total_pages(), 1);
    }
}

use super::ordering::Order;
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// A validated page window: zero-based row offset, positive limit, optional ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestParams")]
pub struct PageRequest {
    offset: u64,
    limit: u64,
    sort: Vec<Order>,
}

/// Unvalidated wire shape of a page request
#[derive(Debug, Clone, Deserialize)]
struct PageRequestParams {
    #[serde(default)]
    offset: i64,
    limit: i64,
    #[serde(default)]
    sort: Vec<Order>,
}

impl TryFrom<PageRequestParams> for PageRequest {
    type Error = SearchError;

    fn try_from(params: PageRequestParams) -> Result<Self> {
        Ok(Self::new(params.offset, params.limit)?.with_sort_terms(params.sort))
    }
}

impl PageRequest {
    /// Create a page window from a row offset and a limit
    pub fn new(offset: i64, limit: i64) -> Result<Self> {
        if offset < 0 {
            return Err(SearchError::ValidationError(format!(
                "page offset must not be negative, got {offset}"
            )));
        }
        if limit <= 0 {
            return Err(SearchError::ValidationError(format!(
                "page limit must be positive, got {limit}"
            )));
        }
        Ok(Self {
            offset: offset.unsigned_abs(),
            limit: limit.unsigned_abs(),
            sort: Vec::new(),
        })
    }

    /// Create a page window from a zero-based page index and page size
    pub fn of_page(page_index: i64, page_size: i64) -> Result<Self> {
        if page_index < 0 {
            return Err(SearchError::ValidationError(format!(
                "page index must not be negative, got {page_index}"
            )));
        }
        let offset = page_index.checked_mul(page_size.max(0)).ok_or_else(|| {
            SearchError::ValidationError(format!(
                "page {page_index} of size {page_size} overflows the row offset"
            ))
        })?;
        Self::new(offset, page_size)
    }

    /// Append an ORDER BY term
    pub fn with_sort(mut self, order: Order) -> Self {
        self.sort.push(order);
        self
    }

    pub fn with_sort_terms(mut self, orders: impl IntoIterator<Item = Order>) -> Self {
        self.sort.extend(orders);
        self
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn sort(&self) -> &[Order] {
        &self.sort
    }

    /// Zero-based page number containing the first row of the window. An offset that
    /// is not a multiple of the limit rounds down.
    pub fn page_index(&self) -> u64 {
        self.offset / self.limit
    }

    /// Same size and ordering, one page further
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
            sort: self.sort.clone(),
        }
    }
}

/// One page of results plus the size of the full filtered set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    page_index: u64,
    page_size: u64,
    offset: u64,
}

impl<T> Page<T> {
    /// Build a page for `request`.
    ///
    /// A count taken separately from the content may lag behind it; the total is
    /// raised to cover every row actually returned so it never undercounts the page.
    pub fn new(content: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let seen = request.offset().saturating_add(content.len() as u64);
        let total_elements = if content.is_empty() {
            total
        } else {
            total.max(seen)
        };
        Self {
            content,
            total_elements,
            page_index: request.page_index(),
            page_size: request.limit(),
            offset: request.offset(),
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Calculate total pages given the page size
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.page_size.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.page_size) < self.total_elements
    }

    /// Whether any matching row precedes the window. Row-offset based, so a window
    /// starting mid-page reports a previous page even though `page_index` is 0.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// The window starts at row 0
    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Convert the content while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page_index: self.page_index,
            page_size: self.page_size,
            offset: self.offset,
        }
    }
}

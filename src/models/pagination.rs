//! Page selection for list endpoints

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Every listing is cut into pages of this many rows
pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query parameter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<i64>,
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        // offset() must stay representable
        if (page - 1).checked_mul(PAGE_SIZE).is_none() {
            return Err(AppError::NotFound(format!(
                "Invalid page ({}): that page contains no results",
                page
            )));
        }
        Ok(Self {
            page,
            per_page: PAGE_SIZE,
        })
    }

    pub fn first() -> Self {
        Self {
            page: 1,
            per_page: PAGE_SIZE,
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: PageQuery) -> AppResult<Self> {
        PageRequest::new(query.page)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the requested page
    pub items: Vec<T>,
    /// Total number of rows across all pages
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    /// Number of pages (at least 1)
    pub num_pages: i64,
}

/// Number of pages needed for `total` rows; an empty listing still has one page
pub fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

impl<T> Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Wrap a fetched page, rejecting pages past the end
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> AppResult<Self> {
        let num_pages = num_pages(total, request.per_page);
        if request.page > num_pages {
            return Err(AppError::NotFound(format!(
                "Invalid page ({}): that page contains no results",
                request.page
            )));
        }
        Ok(Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            num_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::genre::Genre;

    #[test]
    fn test_offsets() {
        let request = PageRequest::new(Some(3)).unwrap();
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(PageRequest::new(None).unwrap(), PageRequest::first());
    }

    #[test]
    fn test_page_zero_is_not_found() {
        assert!(matches!(PageRequest::new(Some(0)), Err(AppError::NotFound(_))));
        assert!(matches!(PageRequest::new(Some(-2)), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_huge_page_is_not_found() {
        assert!(matches!(PageRequest::new(Some(i64::MAX)), Err(AppError::NotFound(_))));
        assert!(matches!(
            PageRequest::new(Some(i64::MAX / PAGE_SIZE + 2)),
            Err(AppError::NotFound(_))
        ));

        let last = PageRequest::new(Some(i64::MAX / PAGE_SIZE + 1)).unwrap();
        assert_eq!(last.offset(), (i64::MAX / PAGE_SIZE) * PAGE_SIZE);
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, 10), 1);
        assert_eq!(num_pages(10, 10), 1);
        assert_eq!(num_pages(11, 10), 2);
    }

    #[test]
    fn test_empty_listing_has_first_page() {
        let page = Paginated::<Genre>::new(vec![], 0, PageRequest::first()).unwrap();
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_past_end_is_not_found() {
        let request = PageRequest::new(Some(3)).unwrap();
        assert!(Paginated::<Genre>::new(vec![], 20, request).is_err());
        assert!(Paginated::<Genre>::new(vec![], 21, request).is_ok());
    }
}

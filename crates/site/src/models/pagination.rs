//! Fixed-size page slicing for the portfolio and blog listings.

use thiserror::Error;

/// The requested page does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page number is not an integer: {0}")]
    NotANumber(String),
    #[error("page {requested} is out of range (1..={last})")]
    OutOfRange { requested: usize, last: usize },
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `all` into pages of `per_page` and return the one named by the
    /// raw `page` query value (absent means 1).
    ///
    /// An empty listing still has a page 1.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] for a non-numeric page or one past the end.
    pub fn paginate(all: Vec<T>, page: Option<&str>, per_page: usize) -> Result<Self, PageError> {
        let per_page = per_page.max(1);
        let number = match page.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| PageError::NotANumber(raw.to_owned()))?,
        };

        let total_pages = all.len().div_ceil(per_page).max(1);
        if number == 0 || number > total_pages {
            return Err(PageError::OutOfRange {
                requested: number,
                last: total_pages,
            });
        }

        let items = all
            .into_iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(Self {
            items,
            number,
            total_pages,
        })
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Transform the items while keeping the page position.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_by_default() {
        let page = Page::paginate((1..=25).collect(), None, 10).unwrap();
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::paginate((1..=25).collect(), Some("3"), 10).unwrap();
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_listing_has_page_one() {
        let page = Page::<i32>::paginate(Vec::new(), Some("1"), 12).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        assert_eq!(
            Page::paginate(vec![1, 2], Some("2"), 12),
            Err(PageError::OutOfRange {
                requested: 2,
                last: 1
            })
        );
        assert!(matches!(
            Page::paginate(vec![1], Some("0"), 12),
            Err(PageError::OutOfRange { .. })
        ));
        assert!(matches!(
            Page::paginate(vec![1], Some("two"), 12),
            Err(PageError::NotANumber(_))
        ));
    }
}

//! Page slicing for post listings.
//!
//! Page numbers are 1-based and come straight from the query string, so they
//! are resolved leniently: anything that is not an integer means page 1 and
//! anything outside `1..=num_pages` means the last page.

use serde::Serialize;

/// Number of posts shown on a listing page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A resolved page position inside a collection of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub count: usize,
}

impl PageWindow {
    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }
}

/// Resolves requested page numbers against a collection size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: usize,
    per_page: usize,
}

impl Paginator {
    pub fn new(count: usize, per_page: usize) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    /// Total number of pages. An empty collection still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw page number as found in the query string.
    pub fn window(&self, requested: Option<&str>) -> PageWindow {
        match requested.and_then(parse_page_number) {
            Some(number) => self.window_for(number),
            None => self.window_for(1),
        }
    }

    /// Resolve a numeric page number, clamping out-of-range values to the last page.
    pub fn window_for(&self, number: i64) -> PageWindow {
        let num_pages = self.num_pages();
        let number = match usize::try_from(number) {
            Ok(n) if (1..=num_pages).contains(&n) => n,
            _ => num_pages,
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            count: self.count,
        }
    }
}

/// One page of items plus its position in the full collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    /// Wrap an already sliced set of items.
    pub fn from_window(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    pub fn number(&self) -> usize {
        self.window.number
    }

    pub fn num_pages(&self) -> usize {
        self.window.num_pages
    }

    /// Total item count across all pages.
    pub fn count(&self) -> usize {
        self.window.count
    }

    pub fn has_next(&self) -> bool {
        self.window.number < self.window.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.window.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.window.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.window.number - 1)
    }

    /// Whether there is more than one page to navigate between.
    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

/// Slice an ordered in-memory collection into the requested page.
pub fn page<T>(collection: Vec<T>, page_number: Option<&str>, page_size: usize) -> Page<T> {
    let window = Paginator::new(collection.len(), page_size).window(page_number);
    let items = collection
        .into_iter()
        .skip(window.offset())
        .take(window.limit())
        .collect();

    Page::from_window(items, window)
}

/// Integer value of a raw page number. Digit runs too long for `i64`
/// saturate, so they still count as out of range rather than as garbage.
fn parse_page_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<i64>() {
        return Some(number);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

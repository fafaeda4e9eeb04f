use serde::Serialize;

/// Number of posts on each page of the list view.
pub const POSTS_PER_PAGE: u64 = 3;

/// One window of a paginated listing.
///
/// Invalid page requests never fail: a missing or non-integer page yields the
/// first page, and a page outside `1..=num_pages` yields the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageInfo {
    pub fn resolve(requested: Option<&str>, total: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);

        let number = match requested.map(|raw| raw.trim().parse::<i64>()) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 || n as u64 > num_pages => num_pages,
            Some(Ok(n)) => n as u64,
        };

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

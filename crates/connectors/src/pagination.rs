//! Pagination
//!
//! Vendors page in one of two ways: `page`/`per_page` style or
//! `offset`/`count` style. Both are reduced to one [`PagedResult`] envelope.
//!
//! When the response carries no authoritative total, `has_next_page` comes
//! from a `has_more` flag if the vendor sends one, otherwise from the
//! "page came back full" heuristic. The heuristic is wrong at the boundary:
//! an exactly full last page reports a next page that will be empty.
//! `total_is_exact` tells callers which case they are in. Every call is
//! stateless; no cursor is kept between pages, so results can shift if the
//! remote collection changes between calls.

use crate::response::{Record, navigate};
use serde::Serialize;
use serde_json::Value;

/// Where to find paging metadata in a response document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTotals {
    /// Dotted path to the total record count (e.g. `total_items`)
    pub total_field: Option<&'static str>,
    /// Dotted path to a "more pages follow" flag (e.g. `page_context.has_more_page`)
    pub has_more_field: Option<&'static str>,
}

impl PageTotals {
    pub const NONE: PageTotals = PageTotals {
        total_field: None,
        has_more_field: None,
    };

    pub const fn total(field: &'static str) -> Self {
        Self {
            total_field: Some(field),
            has_more_field: None,
        }
    }

    pub const fn has_more(field: &'static str) -> Self {
        Self {
            total_field: None,
            has_more_field: Some(field),
        }
    }
}

/// Vendor paging scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStrategy {
    /// 1-based page number plus page size
    PagePerPage {
        page_param: &'static str,
        size_param: &'static str,
        min_size: u32,
        max_size: u32,
        totals: PageTotals,
    },
    /// Zero-based record offset plus page size
    OffsetCount {
        offset_param: &'static str,
        count_param: &'static str,
        min_size: u32,
        max_size: u32,
        totals: PageTotals,
    },
}

impl PagingStrategy {
    fn bounds(&self) -> (u32, u32) {
        let (min, max) = match *self {
            PagingStrategy::PagePerPage {
                min_size, max_size, ..
            }
            | PagingStrategy::OffsetCount {
                min_size, max_size, ..
            } => (min_size, max_size),
        };
        let min = min.max(1);
        (min, max.max(min))
    }

    fn totals(&self) -> PageTotals {
        match *self {
            PagingStrategy::PagePerPage { totals, .. }
            | PagingStrategy::OffsetCount { totals, .. } => totals,
        }
    }

    /// Clamp the page size into the vendor's accepted range
    pub fn clamp_size(&self, page_size: u32) -> u32 {
        let (min, max) = self.bounds();
        page_size.clamp(min, max)
    }

    /// Compute the wire parameters for one page
    ///
    /// Page numbers below 1 are treated as 1.
    pub fn request(&self, page_number: u32, page_size: u32) -> PageRequest {
        let page_number = page_number.max(1);
        let page_size = self.clamp_size(page_size);
        let offset = u64::from(page_number - 1) * u64::from(page_size);

        let params = match *self {
            PagingStrategy::PagePerPage {
                page_param,
                size_param,
                ..
            } => vec![
                (page_param, page_number.to_string()),
                (size_param, page_size.to_string()),
            ],
            PagingStrategy::OffsetCount {
                offset_param,
                count_param,
                ..
            } => vec![
                (offset_param, offset.to_string()),
                (count_param, page_size.to_string()),
            ],
        };

        PageRequest {
            page_number,
            page_size,
            offset,
            params,
            totals: self.totals(),
        }
    }
}

/// A page about to be requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    /// Page size after clamping
    pub page_size: u32,
    /// Records skipped before this page
    pub offset: u64,
    /// Query parameters to send
    pub params: Vec<(&'static str, String)>,
    totals: PageTotals,
}

impl PageRequest {
    /// Build the envelope from the unwrapped page and its response document
    pub fn envelope(&self, data: Vec<Record>, document: &Value) -> PagedResult {
        let size = u64::from(self.page_size);
        let returned = data.len() as u64;
        let total = self
            .totals
            .total_field
            .and_then(|field| navigate(document, field))
            .and_then(as_count);

        let (total_records, total_pages, has_next_page, total_is_exact) = match total {
            Some(total) => (
                total,
                total.div_ceil(size),
                self.offset + size < total,
                true,
            ),
            None => {
                let has_more = self
                    .totals
                    .has_more_field
                    .and_then(|field| navigate(document, field))
                    .and_then(as_flag);
                (
                    self.offset + returned,
                    1,
                    has_more.unwrap_or(returned == size),
                    false,
                )
            }
        };

        PagedResult {
            data,
            page_number: self.page_number,
            page_size: self.page_size,
            total_records,
            total_pages,
            has_previous_page: self.page_number > 1,
            has_next_page,
            total_is_exact,
        }
    }

    /// Envelope for a page whose request failed: nothing seen, nothing known
    pub fn unanswered(&self) -> PagedResult {
        PagedResult {
            data: Vec::new(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_records: 0,
            total_pages: 0,
            has_previous_page: self.page_number > 1,
            has_next_page: false,
            total_is_exact: false,
        }
    }
}

/// Uniform paged envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResult {
    pub data: Vec<Record>,
    pub page_number: u32,
    pub page_size: u32,
    /// Exact when `total_is_exact`, otherwise records seen up to this page
    pub total_records: u64,
    /// Exact when `total_is_exact`, otherwise a placeholder of 1
    /// (0 when the page request failed)
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub total_is_exact: bool,
}

/// Totals arrive as numbers or numeric strings
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Flags arrive as bools, numbers, "yes"/"no" strings or a next-page URL
fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => Some(!matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "no" | "false" | "0"
        )),
        _ => None,
    }
}

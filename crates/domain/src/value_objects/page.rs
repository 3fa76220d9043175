//! Paging and sorting vocabulary.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DomainError;

/// Largest page a caller may request.
pub const PAGE_SIZE_MAX: u32 = 100;
pub const PAGE_SIZE_DEFAULT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison result.
    pub fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::parse(format!(
                "Unknown sort direction: {} (expected asc or desc)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A sortable attribute of one entity kind.
pub trait SortField: Copy + FromStr<Err = DomainError> {
    /// Wire name of the attribute, as accepted in `sortBy`.
    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> Sort<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }
}

/// A validated request for one page of results.
///
/// Pages are zero-based. The size is always within `1..=PAGE_SIZE_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    page: u32,
    size: u32,
    sort: Sort<F>,
}

impl<F: SortField> PageRequest<F> {
    pub fn new(page: u32, size: u32, sort: Sort<F>) -> Result<Self, DomainError> {
        if size == 0 || size > PAGE_SIZE_MAX {
            return Err(DomainError::validation(format!(
                "Page size must be between 1 and {}",
                PAGE_SIZE_MAX
            )));
        }
        Ok(Self { page, size, sort })
    }

    /// Build a request from raw query parameters.
    ///
    /// Missing `sort_by`/`direction` fall back to `default_field` ascending.
    pub fn parse(
        page: u32,
        size: u32,
        sort_by: Option<&str>,
        direction: Option<&str>,
        default_field: F,
    ) -> Result<Self, DomainError> {
        let field = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<F>()?,
            None => default_field,
        };
        let direction = match direction.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SortDirection>()?,
            None => SortDirection::Asc,
        };
        Self::new(page, size, Sort::new(field, direction))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Sort<F> {
        self.sort
    }

    /// Number of matching records that precede this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// The sort that produced a page, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub sort: SortSpec,
}

impl<T> Page<T> {
    pub fn new<F: SortField>(items: Vec<T>, request: &PageRequest<F>, total_items: u64) -> Self {
        let sort = request.sort();
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.size())),
            sort: SortSpec {
                field: sort.field.as_str(),
                direction: sort.direction,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            sort: self.sort,
        }
    }
}

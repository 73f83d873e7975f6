//! Paging and sorting types shared by every repository.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

/// Page size used when the request names none (or zero)
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest page size a request may ask for
pub const MAX_PAGE_SIZE: u64 = 2000;
/// Largest row offset PostgreSQL accepts (`OFFSET` is a bigint)
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl From<Direction> for sea_orm::Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => sea_orm::Order::Asc,
            Direction::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Sort order parsed from `property[,asc|desc]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(format!("sort '{s}' names no property"));
        }

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(dir) => return Err(format!("unknown sort direction '{dir}'")),
        };

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Which page of a result set to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    pub size: u64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// `size` 0 means [`DEFAULT_PAGE_SIZE`]; sizes above [`MAX_PAGE_SIZE`] are capped.
    ///
    /// `page` is capped so that `page * size` stays within [`MAX_OFFSET`]; any
    /// such page lies past the last row and comes back empty.
    pub fn new(page: u64, size: u64) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        Self {
            page: page.min(MAX_OFFSET / size),
            size,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of rows before the first row of this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Query string form of a [`PageRequest`]: `?page=0&size=20&sort=name,desc`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 0-based page index (default 0)
    pub page: Option<u64>,
    /// Page size (default 20, at most 2000)
    pub size: Option<u64>,
    /// `property[,asc|desc]`
    pub sort: Option<String>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let request = PageRequest::new(query.page.unwrap_or(0), query.size.unwrap_or(0));

        match query.sort.as_deref().map(str::parse::<Sort>) {
            Some(Ok(sort)) => request.with_sort(sort),
            Some(Err(reason)) => {
                warn!(%reason, "Ignoring malformed sort parameter");
                request
            }
            None => request,
        }
    }
}

/// One page of results plus the metadata of the whole result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// 0-based index of this page
    pub number: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(request.size.max(1)),
            number: request.page,
            size: request.size,
        }
    }

    /// Cuts the requested page out of an already filtered and sorted result set.
    pub fn slice(items: Vec<T>, request: &PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let content = items
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();
        Self::new(content, request, total_elements)
    }

    /// Maps the content, keeping the metadata unchanged.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parses_property_and_direction() {
        assert_eq!("name".parse::<Sort>().unwrap(), Sort::asc("name"));
        assert_eq!("price,DESC".parse::<Sort>().unwrap(), Sort::desc("price"));
        assert_eq!(" date , asc ".parse::<Sort>().unwrap(), Sort::asc("date"));
    }

    #[test]
    fn test_sort_rejects_garbage() {
        assert!(",desc".parse::<Sort>().is_err());
        assert!("name,sideways".parse::<Sort>().is_err());
    }

    #[test]
    fn test_page_request_size_bounds() {
        assert_eq!(PageRequest::new(0, 0).size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, 5000).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 12).offset(), 36);
    }

    #[test]
    fn test_page_index_keeps_offset_in_bigint_range() {
        let request = PageRequest::new(u64::MAX, 20);
        assert_eq!(request.page, MAX_OFFSET / 20);
        assert!(request.offset() <= MAX_OFFSET);
        assert!(request.page.checked_mul(request.size).is_some());

        let beyond = Page::slice((1..=25).collect::<Vec<u32>>(), &request);
        assert!(beyond.is_empty());
        assert_eq!(beyond.total_elements, 25);
        assert_eq!(beyond.total_pages, 2);

        assert_eq!(PageRequest::new(7, 20).page, 7);
    }

    #[test]
    fn test_page_query_conversion() {
        let request: PageRequest = PageQuery {
            page: Some(2),
            size: None,
            sort: Some("name,desc".to_string()),
        }
        .into();

        assert_eq!(request.page, 2);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort, Some(Sort::desc("name")));
    }

    #[test]
    fn test_page_query_drops_malformed_sort() {
        let request: PageRequest = PageQuery {
            sort: Some("name,up".to_string()),
            ..Default::default()
        }
        .into();

        assert_eq!(request.sort, None);
    }

    #[test]
    fn test_slice_reports_whole_set_metadata() {
        let items: Vec<u32> = (1..=25).collect();

        let last = Page::slice(items.clone(), &PageRequest::new(2, 10));
        assert_eq!(last.content, vec![21, 22, 23, 24, 25]);
        assert_eq!(last.total_elements, 25);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.number, 2);

        let beyond = Page::slice(items, &PageRequest::new(7, 10));
        assert!(beyond.is_empty());
        assert_eq!(beyond.total_elements, 25);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::slice(vec![1, 2, 3], &PageRequest::new(0, 2));
        let mapped = page.clone().map(|n| n.to_string());

        assert_eq!(mapped.content, vec!["1", "2"]);
        assert_eq!(mapped.total_elements, page.total_elements);
        assert_eq!(mapped.total_pages, page.total_pages);
        assert_eq!(mapped.number, page.number);
        assert_eq!(mapped.size, page.size);
    }

    #[test]
    fn test_page_serializes_snake_case_fields() {
        let page = Page::new(vec!["a"], &PageRequest::new(0, 20), 1);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["total_elements"], 1);
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["number"], 0);
        assert_eq!(json["size"], 20);
    }
}

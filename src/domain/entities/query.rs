use std::collections::BTreeMap;

use crate::domain::entities::record::Record;
use crate::domain::pagination::{next_offset, paginate, previous_offset, PageInfo};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const PAGE_SIZE_OPTIONS: [u64; 6] = [25, 50, 100, 200, 500, 1000];

pub type Filters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    limit: u64,
    offset: u64,
    filters: Filters,
    sort: Option<SortSpec>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn new(limit: u64) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
            filters: Filters::new(),
            sort: None,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let name = name.into();
        if value.trim().is_empty() {
            self.filters.remove(&name);
        } else {
            self.filters.insert(name, value);
        }
        self.offset = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.offset = 0;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.offset = 0;
    }

    /// Header click: a new field sorts ascending, the same field flips.
    pub fn toggle_sort(&mut self, field: &str) {
        let direction = match &self.sort {
            Some(current) if current.field == field => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.set_sort(Some(SortSpec::new(field, direction)));
    }

    pub fn active_filters(&self) -> Filters {
        self.filters
            .iter()
            .filter_map(|(name, value)| {
                let value = value.trim();
                (!value.is_empty()).then(|| (name.clone(), value.to_string()))
            })
            .collect()
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.values().any(|value| !value.trim().is_empty())
    }

    pub fn next_page(&mut self, total: u64) -> bool {
        let next = next_offset(total, self.limit, self.offset);
        let moved = next != self.offset;
        self.offset = next;
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let previous = previous_offset(self.limit, self.offset);
        let moved = previous != self.offset;
        self.offset = previous;
        moved
    }

    /// Jumps to the page containing row `offset`.
    pub fn skip_to(&mut self, offset: u64) {
        self.offset = offset - offset % self.limit;
    }

    pub fn page_info(&self, total: u64) -> PageInfo {
        paginate(total, self.limit, self.offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Record>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub fn new(mut items: Vec<Record>, total: u64, limit: u64, offset: u64) -> Self {
        let limit = limit.max(1);
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn info(&self) -> PageInfo {
        paginate(self.total, self.limit, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_to_lands_on_a_page_boundary() {
        let mut query = QueryState::new(50);

        query.skip_to(37);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.page_info(500).first_item, 1);

        query.skip_to(149);
        assert_eq!(query.offset(), 100);
        assert_eq!(query.page_info(500).current_page, 3);

        query.skip_to(200);
        assert_eq!(query.offset(), 200);
    }

    #[test]
    fn set_limit_always_returns_to_first_page() {
        let mut query = QueryState::default();
        assert!(query.next_page(500));
        assert!(query.next_page(500));
        assert_eq!(query.offset(), 100);

        query.set_limit(200);

        assert_eq!(query.limit(), 200);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn zero_limit_is_clamped() {
        let mut query = QueryState::new(0);
        assert_eq!(query.limit(), 1);
        query.set_limit(0);
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn filter_and_sort_changes_reset_offset() {
        let mut query = QueryState::new(10);
        query.next_page(100);
        query.set_filter("region", "us");
        assert_eq!(query.offset(), 0);

        query.next_page(100);
        query.toggle_sort("gmv");
        assert_eq!(query.offset(), 0);

        query.next_page(100);
        query.clear_filters();
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn blank_filter_removes_constraint() {
        let mut query = QueryState::default();
        query.set_filter("name", "lamp");
        assert!(query.has_active_filters());

        query.set_filter("name", "   ");

        assert!(!query.has_active_filters());
        assert!(query.filters().is_empty());
    }

    #[test]
    fn active_filters_are_trimmed() {
        let mut query = QueryState::default();
        query.set_filter("shop_name", "  Acme ");

        let active = query.active_filters();

        assert_eq!(active.get("shop_name").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn toggle_sort_flips_direction_for_same_field() {
        let mut query = QueryState::default();
        query.toggle_sort("gmv");
        assert_eq!(query.sort().map(|sort| sort.direction), Some(SortDirection::Asc));

        query.toggle_sort("gmv");
        assert_eq!(query.sort().map(|sort| sort.direction), Some(SortDirection::Desc));

        query.toggle_sort("video_count");
        assert_eq!(
            query.sort(),
            Some(&SortSpec::new("video_count", SortDirection::Asc))
        );
    }

    #[test]
    fn navigation_is_a_no_op_out_of_bounds() {
        let mut query = QueryState::new(50);
        assert!(!query.previous_page());
        assert_eq!(query.offset(), 0);

        assert!(query.next_page(120));
        assert!(query.next_page(120));
        assert!(!query.next_page(120));
        assert_eq!(query.offset(), 100);

        assert!(query.previous_page());
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn page_truncates_items_to_limit() {
        let items = vec![Record::default(); 5];
        let page = Page::new(items, 5, 3, 0);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 5);
    }
}

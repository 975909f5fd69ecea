#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub first_item: u64,
    pub last_item: u64,
    pub total: u64,
}

pub fn paginate(total: u64, limit: u64, offset: u64) -> PageInfo {
    let limit = limit.max(1);
    let end = offset.saturating_add(limit);
    let (first_item, last_item) = if offset < total {
        (offset + 1, end.min(total))
    } else {
        (0, 0)
    };

    PageInfo {
        current_page: offset / limit + 1,
        total_pages: total.div_ceil(limit),
        has_previous: offset > 0,
        has_next: end < total,
        first_item,
        last_item,
        total,
    }
}

pub fn slice_for_page<T>(records: &[T], limit: u64, offset: u64) -> &[T] {
    let start = usize::try_from(offset)
        .unwrap_or(usize::MAX)
        .min(records.len());
    let len = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
    let end = start.saturating_add(len).min(records.len());
    &records[start..end]
}

pub fn next_offset(total: u64, limit: u64, offset: u64) -> u64 {
    if paginate(total, limit, offset).has_next {
        offset + limit.max(1)
    } else {
        offset
    }
}

pub fn previous_offset(limit: u64, offset: u64) -> u64 {
    offset.saturating_sub(limit.max(1))
}

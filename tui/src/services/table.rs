//! Client-side search, sort and pagination over the aggregated index list.
//!
//! The pipeline is always filter, then sort, then slice.

use lastsync_shared::IndexRecord;
use std::cmp::Ordering;

pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    LastTimestamp,
    DocCount,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::LastTimestamp,
        SortField::DocCount,
        SortField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Index Name",
            SortField::LastTimestamp => "Last Time",
            SortField::DocCount => "Document Count",
            SortField::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One rendered page plus the counters the footer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub rows: Vec<&'a IndexRecord>,
    pub page_index: usize,
    pub page_count: usize,
    pub filtered_count: usize,
}

impl TableQuery {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: normalize_page_size(page_size),
            ..Self::default()
        }
    }

    /// Clicking the active column flips direction; another column is
    /// selected with the current direction kept.
    pub fn select_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = normalize_page_size(page_size);
        self.page_index = 0;
    }

    pub fn next_page_size(&mut self) {
        let position = PAGE_SIZES
            .iter()
            .position(|size| *size == self.page_size)
            .unwrap_or(0);
        let next = PAGE_SIZES
            .get(position + 1)
            .copied()
            .unwrap_or(self.page_size);
        self.set_page_size(next);
    }

    pub fn previous_page_size(&mut self) {
        let position = PAGE_SIZES
            .iter()
            .position(|size| *size == self.page_size)
            .unwrap_or(0);
        let previous = position
            .checked_sub(1)
            .and_then(|index| PAGE_SIZES.get(index))
            .copied()
            .unwrap_or(self.page_size);
        self.set_page_size(previous);
    }

    pub fn apply<'a>(&self, records: &'a [IndexRecord]) -> Page<'a> {
        let mut visible = filter_records(records, &self.search);
        sort_records(&mut visible, self.sort_field, self.sort_direction);
        paginate(visible, self.page_index, self.page_size)
    }
}

fn normalize_page_size(page_size: usize) -> usize {
    if PAGE_SIZES.contains(&page_size) {
        page_size
    } else {
        DEFAULT_PAGE_SIZE
    }
}

/// Case-insensitive substring match on the index name.
pub fn filter_records<'a>(records: &'a [IndexRecord], search: &str) -> Vec<&'a IndexRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort. Missing timestamps sort first ascending and last descending.
pub fn sort_records(records: &mut [&IndexRecord], field: SortField, direction: SortDirection) {
    records.sort_by(|left, right| {
        let ordering = compare_by(left, right, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_by(left: &IndexRecord, right: &IndexRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&left.name, &right.name),
        SortField::LastTimestamp => left.last_timestamp.cmp(&right.last_timestamp),
        SortField::DocCount => left.document_count.cmp(&right.document_count),
        SortField::Status => compare_text(left.status.as_str(), right.status.as_str()),
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// Slices `records` into one page, clamping `page_index` into range.
pub fn paginate(records: Vec<&IndexRecord>, page_index: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let filtered_count = records.len();
    let page_count = filtered_count.div_ceil(page_size).max(1);
    let page_index = page_index.min(page_count - 1);

    let rows = records
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .collect();

    Page {
        rows,
        page_index,
        page_count,
        filtered_count,
    }
}

use std::{fmt, str::FromStr};

use crate::{ModelError, TaskPriority, TaskStatus};

/// Page size used when none is configured.
pub const DEFAULT_LIMIT: u32 = 10;

/// Column the task service orders results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    CreationDate,
    Deadline,
    Status,
    Priority,
}

/// Direction applied to the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// One coherent list request: filters, ordering and the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub sort: Option<SortKey>,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

/// Result of a paginated task query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage<T> {
    pub items: Vec<T>,
    /// Count of all items matching the filter, independent of pagination.
    pub total: usize,
}

impl TaskQuery {
    /// Defaults: first page, no filters, newest first.
    pub fn new() -> Self {
        Self {
            priority: None,
            status: None,
            sort: Some(SortKey::CreationDate),
            order: SortOrder::Desc,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_priority(mut self, priority: Option<TaskPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Pages are 1-based; zero is clamped to the first page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Page size is a positive integer; zero is clamped to one.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Same selection, first page.
    pub fn first_page(&self) -> Self {
        self.clone().with_page(1)
    }

    /// Same selection, following page.
    pub fn next_page(&self) -> Self {
        self.clone().with_page(self.page.saturating_add(1))
    }

    /// Returns `true` if both queries select and order the same tasks,
    /// regardless of which page they point at.
    pub fn same_selection(&self, other: &TaskQuery) -> bool {
        self.priority == other.priority
            && self.status == other.status
            && self.sort == other.sort
            && self.order == other.order
            && self.limit == other.limit
    }

    /// Number of items preceding the current page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::CreationDate,
        SortKey::Deadline,
        SortKey::Status,
        SortKey::Priority,
    ];

    /// Value of the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreationDate => "creation_date",
            SortKey::Deadline => "deadline",
            SortKey::Status => "status",
            SortKey::Priority => "priority",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::CreationDate => "Creation Date",
            SortKey::Deadline => "Deadline",
            SortKey::Status => "Completion",
            SortKey::Priority => "Priority",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        match norm.as_str() {
            "creation_date" | "created" | "creation" => Ok(SortKey::CreationDate),
            "deadline" | "due" => Ok(SortKey::Deadline),
            "status" | "completion" => Ok(SortKey::Status),
            "priority" => Ok(SortKey::Priority),
            _ => Err(ModelError::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortOrder {
    /// Value of the `order` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ModelError::InvalidSortOrder(s.to_string())),
        }
    }
}

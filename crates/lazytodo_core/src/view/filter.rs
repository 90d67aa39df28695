//! Visibility filter for rendered rows.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Visibility predicate selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

/// Stable control names, in display order.
pub const FILTER_ALL: &str = "all";
pub const FILTER_ACTIVE: &str = "active";
pub const FILTER_COMPLETED: &str = "completed";

impl Filter {
    /// Every filter in the order the controls are laid out.
    pub const ALL_FILTERS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => FILTER_ALL,
            Self::Active => FILTER_ACTIVE,
            Self::Completed => FILTER_COMPLETED,
        }
    }

    /// Parses a control name, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, FilterParseError> {
        match value.trim().to_ascii_lowercase().as_str() {
            FILTER_ALL => Ok(Self::All),
            FILTER_ACTIVE => Ok(Self::Active),
            FILTER_COMPLETED => Ok(Self::Completed),
            other => Err(FilterParseError(other.to_string())),
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for FilterParseError {}

/// Holds the session's active filter. Starts at [`Filter::All`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewFilter {
    current: Filter,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: Filter) -> Self {
        Self { current: filter }
    }

    pub fn set(&mut self, filter: Filter) {
        self.current = filter;
    }

    pub fn current(&self) -> Filter {
        self.current
    }

    pub fn is_visible(&self, task: &Task) -> bool {
        self.current.matches(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, ViewFilter};
    use crate::model::task::{Task, TaskId};

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: TaskId::from(id),
            text: format!("task {id}"),
            completed,
        }
    }

    fn visible_ids(filter: &ViewFilter, tasks: &[Task]) -> Vec<String> {
        tasks
            .iter()
            .filter(|task| filter.is_visible(task))
            .map(|task| task.id.to_string())
            .collect()
    }

    #[test]
    fn each_filter_selects_expected_tasks() {
        let tasks = [task("1", false), task("2", true)];
        let mut filter = ViewFilter::new();
        assert_eq!(filter.current(), Filter::All);
        assert_eq!(visible_ids(&filter, &tasks), vec!["1", "2"]);

        filter.set(Filter::Active);
        assert_eq!(visible_ids(&filter, &tasks), vec!["1"]);

        filter.set(Filter::Completed);
        assert_eq!(visible_ids(&filter, &tasks), vec!["2"]);

        filter.set(Filter::All);
        assert_eq!(visible_ids(&filter, &tasks), vec!["1", "2"]);
    }

    #[test]
    fn parse_accepts_control_names() {
        assert_eq!(Filter::parse(" Active ").unwrap(), Filter::Active);
        assert_eq!(Filter::parse("completed").unwrap(), Filter::Completed);
        let err = Filter::parse("done").unwrap_err();
        assert!(err.to_string().contains("done"));
    }
}

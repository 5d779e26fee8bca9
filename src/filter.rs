// Filter modes for listing tasks

use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Which subset of tasks a view displays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    /// Parse a mode name; anything unrecognized means `All`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => FilterMode::Active,
            "completed" => FilterMode::Completed,
            _ => FilterMode::All,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_modes() {
        assert_eq!(FilterMode::parse("all"), FilterMode::All);
        assert_eq!(FilterMode::parse("active"), FilterMode::Active);
        assert_eq!(FilterMode::parse("completed"), FilterMode::Completed);
        assert_eq!(FilterMode::parse(" Active "), FilterMode::Active);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_all() {
        assert_eq!(FilterMode::parse(""), FilterMode::All);
        assert_eq!(FilterMode::parse("done"), FilterMode::All);
        assert_eq!("whatever".parse::<FilterMode>().unwrap(), FilterMode::All);
    }

    #[test]
    fn test_matches() {
        let open = Task::from_parts("a", "open", false);
        let done = Task::from_parts("b", "done", true);

        assert!(FilterMode::All.matches(&open));
        assert!(FilterMode::All.matches(&done));
        assert!(FilterMode::Active.matches(&open));
        assert!(!FilterMode::Active.matches(&done));
        assert!(!FilterMode::Completed.matches(&open));
        assert!(FilterMode::Completed.matches(&done));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(FilterMode::Completed.to_string(), "completed");
        assert_eq!(serde_json::to_string(&FilterMode::Active).unwrap(), "\"active\"");
        let mode: FilterMode = serde_yaml::from_str("completed").unwrap();
        assert_eq!(mode, FilterMode::Completed);
    }
}

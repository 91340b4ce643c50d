use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BuildId, Error, LogMessageId, ProjectId, Result, TargetId, TaskId};

/// Final state of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Succeeded,
    Failed,
    InProgress,
    Cancelled,
}

impl BuildOutcome {
    pub const fn code(self) -> i64 {
        match self {
            BuildOutcome::Succeeded => 0,
            BuildOutcome::Failed => 1,
            BuildOutcome::InProgress => 2,
            BuildOutcome::Cancelled => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(BuildOutcome::Succeeded),
            1 => Ok(BuildOutcome::Failed),
            2 => Ok(BuildOutcome::InProgress),
            3 => Ok(BuildOutcome::Cancelled),
            _ => Err(Error::UnknownCode {
                kind: "build outcome",
                code,
            }),
        }
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Succeeded => write!(f, "Succeeded"),
            BuildOutcome::Failed => write!(f, "Failed"),
            BuildOutcome::InProgress => write!(f, "In Progress"),
            BuildOutcome::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Outcome of a single task within a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    NotApplicable,
    Succeeded,
    Covered,
    Cached,
    Prebuilt,
    Failed,
    Empty,
}

impl TaskOutcome {
    pub const fn code(self) -> i64 {
        match self {
            TaskOutcome::NotApplicable => -1,
            TaskOutcome::Succeeded => 0,
            TaskOutcome::Covered => 1,
            TaskOutcome::Cached => 2,
            TaskOutcome::Prebuilt => 3,
            TaskOutcome::Failed => 4,
            TaskOutcome::Empty => 5,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            -1 => Ok(TaskOutcome::NotApplicable),
            0 => Ok(TaskOutcome::Succeeded),
            1 => Ok(TaskOutcome::Covered),
            2 => Ok(TaskOutcome::Cached),
            3 => Ok(TaskOutcome::Prebuilt),
            4 => Ok(TaskOutcome::Failed),
            5 => Ok(TaskOutcome::Empty),
            _ => Err(Error::UnknownCode {
                kind: "task outcome",
                code,
            }),
        }
    }
}

/// Severity of a build log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
    Critical,
    Exception,
}

impl MessageLevel {
    pub const fn code(self) -> i64 {
        match self {
            MessageLevel::Info => 0,
            MessageLevel::Warning => 1,
            MessageLevel::Error => 2,
            MessageLevel::Critical => 3,
            MessageLevel::Exception => 4,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(MessageLevel::Info),
            1 => Ok(MessageLevel::Warning),
            2 => Ok(MessageLevel::Error),
            3 => Ok(MessageLevel::Critical),
            4 => Ok(MessageLevel::Exception),
            _ => Err(Error::UnknownCode {
                kind: "log level",
                code,
            }),
        }
    }
}

/// One execution of the build system against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub project_id: ProjectId,
    pub machine: String,
    pub outcome: BuildOutcome,
    pub started_on: NaiveDateTime,
    pub completed_on: NaiveDateTime,
    pub cooker_log_path: Option<String>,
}

impl Build {
    pub fn timespent_seconds(&self) -> i64 {
        (self.completed_on - self.started_on).num_seconds().max(0)
    }
}

/// What a build was asked to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub build_id: BuildId,
    pub target: String,
    pub task: Option<String>,
}

impl Target {
    /// `target:task` when a task was requested, otherwise just the target.
    pub fn label(&self) -> String {
        match self.task.as_deref() {
            Some(task) if !task.is_empty() => format!("{}:{}", self.target, task),
            _ => self.target.clone(),
        }
    }
}

/// A unit of work within a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub build_id: BuildId,
    pub recipe_name: String,
    pub task_name: String,
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub id: LogMessageId,
    pub build_id: BuildId,
    pub level: MessageLevel,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_outcome_codes_round_trip() {
        for outcome in [
            BuildOutcome::Succeeded,
            BuildOutcome::Failed,
            BuildOutcome::InProgress,
            BuildOutcome::Cancelled,
        ] {
            assert_eq!(BuildOutcome::from_code(outcome.code()).unwrap(), outcome);
        }
        assert!(BuildOutcome::from_code(9).is_err());
        assert_eq!(TaskOutcome::from_code(-1).unwrap(), TaskOutcome::NotApplicable);
        assert_eq!(TaskOutcome::Failed.code(), 4);
    }

    #[test]
    fn test_target_label() {
        let mut target = Target {
            id: TargetId::new(1),
            build_id: BuildId::new(1),
            target: "core-image-minimal".to_string(),
            task: None,
        };
        assert_eq!(target.label(), "core-image-minimal");
        target.task = Some("populate_sdk".to_string());
        assert_eq!(target.label(), "core-image-minimal:populate_sdk");
    }

    #[test]
    fn test_timespent_seconds() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let build = Build {
            id: BuildId::new(1),
            project_id: ProjectId::new(1),
            machine: "qemux86".to_string(),
            outcome: BuildOutcome::Succeeded,
            started_on: day.and_hms_opt(10, 0, 0).unwrap(),
            completed_on: day.and_hms_opt(11, 2, 5).unwrap(),
            cooker_log_path: None,
        };
        assert_eq!(build.timespent_seconds(), 3725);
    }
}

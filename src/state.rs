// src/state.rs
// =============================================================================
// The four-state result model shared by the profile fetch and the AI insight.
//
//   Idle ──► Loading ──► Success(T)
//                   └──► Error(message)
//
// Using an enum means "data only on success, message only on error" holds
// by construction instead of by convention.
// =============================================================================

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum TaskState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for TaskState<T> {
    fn default() -> Self {
        TaskState::Idle
    }
}

impl<T> TaskState<T> {
    pub fn status(&self) -> Status {
        match self {
            TaskState::Idle => Status::Idle,
            TaskState::Loading => Status::Loading,
            TaskState::Success(_) => Status::Success,
            TaskState::Error(_) => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            TaskState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            TaskState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, TaskState::Loading)
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for TaskState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => TaskState::Success(data),
            Err(err) => TaskState::Error(err.to_string()),
        }
    }
}

//! Fatal conditions raised while loading or mutating the task log.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    // Log format violations
    #[error("Invalid time: {0}")]
    InvalidTimestamp(String),

    #[error("\"off\" found with no task... {0}")]
    OffWithoutTask(String),

    #[error("Task not completed... {0}")]
    TaskNotCompleted(String),

    #[error("Task name missing... {0}")]
    MissingTaskName(String),

    // Argument errors
    #[error("Invalid time")]
    InvalidClockTime,

    #[error("Invalid elapsed time")]
    InvalidElapsed,

    #[error("Invalid task name: {0:?}")]
    InvalidTaskName(String),

    #[error("No task given")]
    NoTaskGiven,

    #[error("No new name given")]
    NoNewName,

    // State errors
    #[error("No current task")]
    NoCurrentTask,

    #[error("No previous task")]
    NoPreviousTask,

    #[error("Current task not completed")]
    CurrentTaskOpen,
}

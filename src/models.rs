use crate::clock::format_timestamp;
use crate::error::TaskError;
use chrono::{DateTime, Local};

/// Separates an optional project from the task name.
pub const DELIMITER: &str = " - ";

/// Payload of a stop event. Also reserved: no task may carry this name.
pub const OFF: &str = "off";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub start: DateTime<Local>,
    pub end: Option<DateTime<Local>>,
    pub project: String,
    pub name: String,
}

impl TaskRecord {
    pub fn open(start: DateTime<Local>, project: &str, name: &str) -> Self {
        Self {
            start,
            end: None,
            project: project.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Seconds between start and end, `None` while the task is open.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_seconds())
    }

    /// `project - name`, or just `name` without a project.
    pub fn label(&self) -> String {
        if self.project.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.project, DELIMITER, self.name)
        }
    }

    pub fn start_line(&self) -> String {
        format!("{} {}", format_timestamp(&self.start), self.label())
    }

    pub fn end_line(&self) -> Option<String> {
        self.end.as_ref().map(off_line)
    }
}

/// The stop event written for a task ending at `end`.
pub fn off_line(end: &DateTime<Local>) -> String {
    format!("{} {}", format_timestamp(end), OFF)
}

/// Splits `project - name` on the first delimiter.
pub fn split_label(text: &str) -> (&str, &str) {
    match text.split_once(DELIMITER) {
        Some((project, name)) => (project, name),
        None => ("", text),
    }
}

/// Splits task text given on the command line and checks that it survives a
/// write/read cycle of the log unchanged.
pub fn parse_task_text(text: &str) -> Result<(String, String), TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::NoTaskGiven);
    }
    if text.contains(['\n', '\r']) {
        return Err(TaskError::InvalidTaskName(text.to_string()));
    }

    let (project, name) = split_label(text);
    if name.trim().is_empty() || (name == OFF && project.is_empty()) {
        return Err(TaskError::InvalidTaskName(text.to_string()));
    }
    Ok((project.to_string(), name.to_string()))
}

/// Tasks in chronological order. Only the last one may be open.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskLog {
    pub tasks: Vec<TaskRecord>,
}

impl TaskLog {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn last(&self) -> Option<&TaskRecord> {
        self.tasks.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut TaskRecord> {
        self.tasks.last_mut()
    }

    /// The open task, if the log ends in one.
    pub fn current(&self) -> Option<&TaskRecord> {
        self.tasks.last().filter(|task| task.is_open())
    }

    pub fn current_mut(&mut self) -> Option<&mut TaskRecord> {
        self.tasks.last_mut().filter(|task| task.is_open())
    }

    /// Appends a new open task. The caller closes any open task first.
    pub fn push_open(&mut self, start: DateTime<Local>, project: &str, name: &str) {
        debug_assert!(self.current().is_none());
        self.tasks.push(TaskRecord::open(start, project, name));
    }

    /// Sets the end of the open task and returns it.
    pub fn close_current(&mut self, end: DateTime<Local>) -> Option<&TaskRecord> {
        let task = self.current_mut()?;
        task.end = Some(end);
        Some(&*task)
    }

    /// Removes the open task, leaving closed history alone.
    pub fn remove_current(&mut self) -> Option<TaskRecord> {
        if self.current().is_some() {
            self.tasks.pop()
        } else {
            None
        }
    }

    pub fn rename_current(&mut self, project: &str, name: &str) -> Option<&TaskRecord> {
        let task = self.current_mut()?;
        task.project = project.to_string();
        task.name = name.to_string();
        Some(&*task)
    }
}

use crate::clock::{parse_timestamp, TIMESTAMP_FIELD, TIMESTAMP_LEN};
use crate::error::TaskError;
use crate::models::{split_label, TaskLog, OFF};
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Rebuilds a task log from its text form.
///
/// Lines alternate between a start event (`<timestamp> [project - ]name`)
/// and a stop event (`<timestamp> off`); a trailing start leaves that task
/// open. Any malformed line aborts the whole load.
pub fn parse_log<R: BufRead>(reader: R) -> Result<TaskLog> {
    let mut log = TaskLog::default();

    for line in reader.lines() {
        let line = line.context("Could not read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let stamp = line
            .get(..TIMESTAMP_LEN)
            .ok_or_else(|| TaskError::InvalidTimestamp(line.to_string()))?;
        let start = parse_timestamp(stamp)?;
        let payload = line.get(TIMESTAMP_FIELD..).unwrap_or("");

        if log.current().is_none() {
            if payload == OFF {
                return Err(TaskError::OffWithoutTask(line.to_string()).into());
            }
            if payload.is_empty() {
                return Err(TaskError::MissingTaskName(line.to_string()).into());
            }
            let (project, name) = split_label(payload);
            log.push_open(start, project, name);
        } else {
            if payload != OFF {
                return Err(TaskError::TaskNotCompleted(line.to_string()).into());
            }
            let closed = log.close_current(start);
            if closed.and_then(|task| task.duration_secs()).unwrap_or(0) < 0 {
                tracing::warn!("Negative time for task... {}", line);
            }
        }
    }

    Ok(log)
}

/// Writes every task as its start line, followed by its stop line once closed.
pub fn write_log<W: Write>(mut w: W, log: &TaskLog) -> io::Result<()> {
    for task in &log.tasks {
        writeln!(w, "{}", task.start_line())?;
        if let Some(end_line) = task.end_line() {
            writeln!(w, "{}", end_line)?;
        }
    }
    w.flush()
}

/// The log file of one invocation.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parses the log, creating an empty file first if there is none.
    pub fn load(&self) -> Result<TaskLog> {
        if !self.path.exists() {
            File::create(&self.path).with_context(|| {
                format!("Can't open file for writing: {}", self.path.display())
            })?;
            tracing::debug!(path = %self.path.display(), "created empty log");
            return Ok(TaskLog::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Can't open file for reading: {}", self.path.display()))?;
        let log = parse_log(BufReader::new(file))?;
        tracing::debug!(path = %self.path.display(), tasks = log.len(), "loaded log");
        Ok(log)
    }

    /// Adds lines to the end of the log without touching existing content.
    pub fn append_lines(&self, lines: &[String]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| {
                format!("Can't open file for appending: {}", self.path.display())
            })?;
        for line in lines {
            writeln!(file, "{}", line)?;
        }
        file.flush()?;
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "appended");
        Ok(())
    }

    /// Replaces the whole log with the serialized `log`.
    pub fn rewrite_all(&self, log: &TaskLog) -> Result<()> {
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        let file = File::create(&tmp_path)
            .with_context(|| format!("Can't open file for writing: {}", tmp_path.display()))?;
        write_log(BufWriter::new(file), log)?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Can't replace file: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), tasks = log.len(), "rewrote log");
        Ok(())
    }
}

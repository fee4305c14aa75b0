use crate::clock::{apply_clock_time, parse_clock_time, parse_elapsed, ClockTime};
use crate::error::TaskError;
use crate::models::{off_line, parse_task_text, TaskLog};
use crate::report::Reporter;
use crate::storage::Storage;
use anyhow::Result;
use chrono::{DateTime, Duration, Local};
use std::io::Write;

/// Seconds between an automatically closed task's stop and the start of the
/// task replacing it. Keeps every timestamp in the log distinct.
pub const AUTO_CLOSE_GAP_SECS: i64 = 1;

/// Argument meaning "use the current time" for `on` and `off`.
pub const RESET: &str = "reset";

/// When the open task stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAt {
    Now,
    /// Given hour and minute on the task's start date.
    Clock(ClockTime),
    /// A fixed time after the task's start.
    Elapsed(Duration),
}

/// Replacement for a boundary timestamp of the most recent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Now,
    /// Given hour and minute, date unchanged.
    Clock(ClockTime),
}

fn resolve(
    now: DateTime<Local>,
    base: &DateTime<Local>,
    adjust: Adjust,
) -> Result<DateTime<Local>, TaskError> {
    match adjust {
        Adjust::Now => Ok(now),
        Adjust::Clock(clock) => apply_clock_time(base, clock),
    }
}

pub struct Tracker {
    pub storage: Storage,
    pub log: TaskLog,
    pub now: DateTime<Local>,
}

impl Tracker {
    /// Loads the log behind `storage`. `now` is the single current instant
    /// used by every operation of this invocation.
    pub fn new(storage: Storage, now: DateTime<Local>) -> Result<Self> {
        let log = storage.load()?;
        Ok(Self { storage, log, now })
    }

    fn reporter(&self) -> Reporter<'_> {
        Reporter::new(&self.log, self.now)
    }

    pub fn show_current<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(
            w,
            "tasktimes - Simple command-line time tracking (\"tasktimes help\" for usage)\n"
        )?;
        let reporter = self.reporter();
        match self.log.current() {
            Some(task) => writeln!(w, "Current task: {}", reporter.task_line(task, true))?,
            None => {
                writeln!(w, "No current task")?;
                match self.log.last() {
                    Some(task) => {
                        writeln!(w, "Previous task: {}", reporter.task_line(task, true))?
                    }
                    None => writeln!(w, "No previous task")?,
                }
            }
        }
        Ok(())
    }

    pub fn report<W: Write>(&self, w: W) -> Result<()> {
        self.reporter().report(w)?;
        Ok(())
    }

    /// `on <arg>`: `reset` or a clock time moves the open task's start,
    /// anything else starts a new task.
    pub fn on<W: Write>(&mut self, arg: Option<&str>, w: W) -> Result<()> {
        let arg = arg.ok_or(TaskError::NoTaskGiven)?;
        if arg == RESET {
            return self.adjust_start(Adjust::Now, w);
        }
        if let Some(clock) = parse_clock_time(arg)? {
            return self.adjust_start(Adjust::Clock(clock), w);
        }
        self.start_task(arg, w)
    }

    /// `off [arg]`: stops the open task, or corrects the last stop when
    /// nothing is open.
    pub fn off<W: Write>(&mut self, arg: Option<&str>, w: W) -> Result<()> {
        let clock = match arg {
            Some(text) => parse_clock_time(text)?,
            None => None,
        };
        let reset = arg == Some(RESET);

        if self.log.current().is_some() {
            if reset {
                return Err(TaskError::CurrentTaskOpen.into());
            }
            let at = match (clock, arg) {
                (Some(clock), _) => StopAt::Clock(clock),
                (None, Some(text)) => StopAt::Elapsed(parse_elapsed(text)?),
                (None, None) => StopAt::Now,
            };
            self.stop_current(at, w)
        } else if reset {
            self.adjust_end(Adjust::Now, w)
        } else if let Some(clock) = clock {
            self.adjust_end(Adjust::Clock(clock), w)
        } else {
            Err(TaskError::NoCurrentTask.into())
        }
    }

    pub fn rename<W: Write>(&mut self, arg: Option<&str>, w: W) -> Result<()> {
        let text = arg
            .filter(|text| !text.trim().is_empty())
            .ok_or(TaskError::NoNewName)?;
        self.rename_current(text, w)
    }

    /// Starts a task, closing the open one first.
    pub fn start_task<W: Write>(&mut self, text: &str, mut w: W) -> Result<()> {
        let (project, name) = parse_task_text(text)?;
        let mut lines = Vec::new();
        let mut start = self.now;

        if let Some(current) = self.log.current() {
            tracing::warn!("Completing current task... {}", current.label());
            lines.push(self.close_at(self.now));
            start = self.now + Duration::seconds(AUTO_CLOSE_GAP_SECS);
        }

        self.log.push_open(start, &project, &name);
        if let Some(task) = self.log.current() {
            lines.push(task.start_line());
        }
        self.storage.append_lines(&lines)?;

        for line in &lines {
            writeln!(w, "\"{}\" added", line)?;
        }
        Ok(())
    }

    /// Closes the open task at `end` and returns its stop line.
    fn close_at(&mut self, end: DateTime<Local>) -> String {
        let line = off_line(&end);
        if let Some(task) = self.log.close_current(end) {
            if end < task.start {
                tracing::warn!("Negative time for task... {}", line);
            }
        }
        line
    }

    pub fn stop_current<W: Write>(&mut self, at: StopAt, mut w: W) -> Result<()> {
        let current = self.log.current().ok_or(TaskError::NoCurrentTask)?;
        let end = match at {
            StopAt::Now => self.now,
            StopAt::Clock(clock) => apply_clock_time(&current.start, clock)?,
            StopAt::Elapsed(elapsed) => current
                .start
                .checked_add_signed(elapsed)
                .ok_or(TaskError::InvalidElapsed)?,
        };

        let line = self.close_at(end);
        self.storage.append_lines(std::slice::from_ref(&line))?;

        writeln!(w, "\"{}\" added", line)?;
        Ok(())
    }

    /// Starts the most recent task again under the same project and name.
    pub fn resume_previous<W: Write>(&mut self, mut w: W) -> Result<()> {
        if self.log.current().is_some() {
            return Err(TaskError::CurrentTaskOpen.into());
        }
        let previous = self.log.last().ok_or(TaskError::NoPreviousTask)?;
        let (project, name) = (previous.project.clone(), previous.name.clone());

        self.log.push_open(self.now, &project, &name);
        let line = self
            .log
            .current()
            .map(|task| task.start_line())
            .unwrap_or_default();
        self.storage.append_lines(std::slice::from_ref(&line))?;

        writeln!(w, "Added task:\n{}", line)?;
        Ok(())
    }

    pub fn adjust_start<W: Write>(&mut self, adjust: Adjust, mut w: W) -> Result<()> {
        let now = self.now;
        let task = self.log.current_mut().ok_or(TaskError::NoCurrentTask)?;
        let before = task.start_line();
        task.start = resolve(now, &task.start, adjust)?;
        let after = task.start_line();
        self.storage.rewrite_all(&self.log)?;

        writeln!(w, "Changing current task from:\n{}\nto:\n{}", before, after)?;
        Ok(())
    }

    pub fn adjust_end<W: Write>(&mut self, adjust: Adjust, mut w: W) -> Result<()> {
        let now = self.now;
        let task = self.log.last_mut().ok_or(TaskError::NoPreviousTask)?;
        let Some(end) = task.end else {
            return Err(TaskError::CurrentTaskOpen.into());
        };

        let end = resolve(now, &end, adjust)?;
        let before = task.end_line().unwrap_or_default();
        task.end = Some(end);
        let after = off_line(&end);
        if end < task.start {
            tracing::warn!("Negative time for task... {}", after);
        }
        self.storage.rewrite_all(&self.log)?;

        writeln!(w, "Changing previous task from:\n{}\nto:\n{}", before, after)?;
        Ok(())
    }

    pub fn rename_current<W: Write>(&mut self, text: &str, mut w: W) -> Result<()> {
        let current = self.log.current().ok_or(TaskError::NoCurrentTask)?;
        let before = self.reporter().task_line(current, true);
        let (project, name) = parse_task_text(text)?;

        self.log.rename_current(&project, &name);
        let reporter = self.reporter();
        let after = self
            .log
            .current()
            .map(|task| reporter.task_line(task, true))
            .unwrap_or_default();
        self.storage.rewrite_all(&self.log)?;

        writeln!(w, "Changing current task from:\n{}\nto:\n{}", before, after)?;
        Ok(())
    }

    /// Drops the open task from the log entirely.
    pub fn delete_current<W: Write>(&mut self, mut w: W) -> Result<()> {
        let current = self.log.current().ok_or(TaskError::NoCurrentTask)?;
        let line = self.reporter().task_line(current, true);

        self.log.remove_current();
        self.storage.rewrite_all(&self.log)?;

        writeln!(w, "Removing task:\n{}", line)?;
        Ok(())
    }
}

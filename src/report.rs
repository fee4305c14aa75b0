use crate::clock::{day_of_week, format_timestamp};
use crate::models::{TaskLog, TaskRecord};
use crate::utils::format_duration;
use chrono::{DateTime, Datelike, Local};
use std::io::{self, Write};

/// Weekday abbreviations, Sunday first.
const DAY_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Section title for tasks without a project.
const MISC: &str = "Misc";

pub struct Reporter<'a> {
    log: &'a TaskLog,
    now: DateTime<Local>,
}

impl<'a> Reporter<'a> {
    pub fn new(log: &'a TaskLog, now: DateTime<Local>) -> Self {
        Self { log, now }
    }

    /// Duration of a task, measuring the open task up to now.
    pub fn duration_secs(&self, task: &TaskRecord) -> i64 {
        task.duration_secs()
            .unwrap_or_else(|| (self.now - task.start).num_seconds())
    }

    /// `2013/03/11 09:00:00 Mo ( 1:30:00) prj - stuff`, with `*` instead of the
    /// space in front of the label while the task is still running.
    pub fn task_line(&self, task: &TaskRecord, with_project: bool) -> String {
        let start = task.start;
        let day = day_of_week(start.year(), start.month(), start.day())
            .map_or("??", |d| DAY_NAMES[d as usize]);
        let mark = if task.is_open() { '*' } else { ' ' };
        let label = if with_project {
            task.label()
        } else {
            task.name.clone()
        };

        format!(
            "{} {} ({:>8}){}{}",
            format_timestamp(&start),
            day,
            format_duration(self.duration_secs(task)),
            mark,
            label
        )
    }

    /// Tasks grouped by project, in order of each project's first task.
    fn group_by_project(&self) -> Vec<(&'a str, Vec<&'a TaskRecord>)> {
        let log: &'a TaskLog = self.log;
        let mut groups: Vec<(&'a str, Vec<&'a TaskRecord>)> = Vec::new();
        for task in &log.tasks {
            let seen = groups.iter().position(|group| group.0 == task.project);
            match seen {
                Some(i) => groups[i].1.push(task),
                None => groups.push((task.project.as_str(), vec![task])),
            }
        }
        groups
    }

    pub fn report<W: Write>(&self, mut w: W) -> io::Result<()> {
        if self.log.is_empty() {
            writeln!(w, "No tasks recorded yet.")?;
            return Ok(());
        }

        let groups = self.group_by_project();
        let mut total = 0;

        for (project, tasks) in &groups {
            let title = if project.is_empty() { MISC } else { *project };
            writeln!(w, "\n--- {} ---", title)?;

            let mut project_total = 0;
            for task in tasks {
                writeln!(w, "{}", self.task_line(task, false))?;
                project_total += self.duration_secs(task);
            }
            writeln!(
                w,
                "                 Total {:>9}",
                format_duration(project_total)
            )?;
            total += project_total;
        }

        if groups.len() > 1 {
            writeln!(
                w,
                "     {:2} Projects Total {:>9}",
                groups.len(),
                format_duration(total)
            )?;
        }

        Ok(())
    }
}

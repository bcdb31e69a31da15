//! A small file-based build graph.
//!
//! Tasks declare the files they read, the files they produce, and the tasks
//! they must run after. A task whose targets all exist and are at least as
//! new as every input is skipped unless the run is forced.

use crate::error::PipelineError;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

pub type Action = Box<dyn FnMut() -> anyhow::Result<()>>;

pub struct Task {
    pub name: String,
    pub doc: Option<String>,
    pub file_dep: Vec<PathBuf>,
    pub targets: Vec<PathBuf>,
    pub task_dep: Vec<String>,
    action: Action,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            file_dep: Vec::new(),
            targets: Vec::new(),
            task_dep: Vec::new(),
            action: Box::new(action),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn file_dep(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_dep.push(path.into());
        self
    }

    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.targets.push(path.into());
        self
    }

    pub fn targets<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.targets.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn task_dep(mut self, name: impl Into<String>) -> Self {
        self.task_dep.push(name.into());
        self
    }

    /// Whether the task can be skipped.
    ///
    /// A task without targets always runs. A missing file dependency is an
    /// error: nothing could bring it up to date.
    pub fn is_up_to_date(&self) -> Result<bool, PipelineError> {
        let mut newest_dep: Option<SystemTime> = None;
        for dep in &self.file_dep {
            let modified = modified(dep).ok_or_else(|| PipelineError::MissingFileDependency {
                task: self.name.clone(),
                path: dep.clone(),
            })?;
            newest_dep = newest_dep.max(Some(modified));
        }

        if self.targets.is_empty() {
            return Ok(false);
        }

        let mut oldest_target: Option<SystemTime> = None;
        for target in &self.targets {
            match modified(target) {
                Some(time) => oldest_target = Some(oldest_target.map_or(time, |t| t.min(time))),
                None => return Ok(false),
            }
        }

        Ok(match (oldest_target, newest_dep) {
            (Some(target), Some(dep)) => target >= dep,
            _ => true,
        })
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("file_dep", &self.file_dep)
            .field("targets", &self.targets)
            .field("task_dep", &self.task_dep)
            .finish_non_exhaustive()
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    UpToDate,
    Outdated,
    /// A file dependency does not exist yet.
    MissingInput,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TaskStatus::UpToDate => "up-to-date",
            TaskStatus::Outdated => "run",
            TaskStatus::MissingInput => "missing input",
        })
    }
}

#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    show_progress: bool,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            show_progress: true,
        }
    }
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the progress bar; tests and scripted runs turn it off.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn add(&mut self, task: Task) -> Result<(), PipelineError> {
        if self.tasks.iter().any(|t| t.name == task.name) {
            return Err(PipelineError::DuplicateTask(task.name));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task indices in execution order.
    ///
    /// Dependencies come first; otherwise declaration order is kept.
    pub fn ordered(&self) -> Result<Vec<usize>, PipelineError> {
        let index: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), i))
            .collect();

        let mut pending = vec![0usize; self.tasks.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.tasks.len()];
        for (i, task) in self.tasks.iter().enumerate() {
            for dep in &task.task_dep {
                let &d = index.get(dep.as_str()).ok_or_else(|| PipelineError::UnknownDependency {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                })?;
                pending[i] += 1;
                dependents[d].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..self.tasks.len()).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(self.tasks.len());
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for &next in &dependents[i] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < self.tasks.len() {
            let stuck = (0..self.tasks.len())
                .filter(|i| !order.contains(i))
                .map(|i| self.tasks[i].name.clone())
                .collect();
            return Err(PipelineError::Cycle(stuck));
        }
        Ok(order)
    }

    /// Up-to-date status of every task, in execution order.
    pub fn status(&self) -> Result<Vec<(&Task, TaskStatus)>, PipelineError> {
        self.ordered()?
            .into_iter()
            .map(|i| {
                let task = &self.tasks[i];
                let status = match task.is_up_to_date() {
                    Ok(true) => TaskStatus::UpToDate,
                    Ok(false) => TaskStatus::Outdated,
                    Err(PipelineError::MissingFileDependency { .. }) => TaskStatus::MissingInput,
                    Err(e) => return Err(e),
                };
                Ok((task, status))
            })
            .collect()
    }

    /// Runs every outdated task (or all of them when `force` is set).
    ///
    /// The first failing action aborts the run.
    pub fn run(&mut self, force: bool) -> Result<RunSummary, PipelineError> {
        let order = self.ordered()?;
        let progress = if self.show_progress {
            let bar = ProgressBar::new(order.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("=>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut summary = RunSummary::default();
        for i in order {
            let task = &mut self.tasks[i];
            progress.set_message(task.name.clone());

            if !force && task.is_up_to_date()? {
                debug!("Task {} is up to date", task.name);
                summary.skipped.push(task.name.clone());
                progress.inc(1);
                continue;
            }

            info!("Running task {}", task.name);
            (task.action)().map_err(|e| PipelineError::TaskFailed {
                task: task.name.clone(),
                message: format!("{e:#}"),
            })?;
            summary.executed.push(task.name.clone());
            progress.inc(1);
        }

        progress.finish_with_message("done");
        info!(
            "Pipeline finished: {} executed, {} up to date",
            summary.executed.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}

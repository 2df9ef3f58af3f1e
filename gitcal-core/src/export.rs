//! One export run: resolve every source, collect its events and write the
//! calendars.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::collect::{RecordKinds, collect};
use crate::error::{ExportResult, GitlabError, GitlabResult};
use crate::event::NamedEvents;
use crate::gitlab::{GitLab, Scope};
use crate::merge::merge;
use crate::writer::{WriteOutcome, write_all};

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub projects: BTreeSet<u64>,
    pub groups: BTreeSet<u64>,
    pub kinds: RecordKinds,
    /// Days before the due date for the alarm; 0 means no alarm
    pub reminder_days: u32,
    /// Write one calendar with this name instead of one per source
    pub combine: Option<String>,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Project,
    Group,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Project => f.write_str("project"),
            SourceKind::Group => f.write_str("group"),
        }
    }
}

/// A source that was skipped.
#[derive(Debug)]
pub struct FailedSource {
    pub kind: SourceKind,
    pub id: u64,
    pub error: GitlabError,
}

impl fmt::Display for FailedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, id, error) = (self.kind, self.id, &self.error);
        if error.is_resolution_failure() {
            write!(f, "The {kind} with the ID {id} could not be found or is not accessible: {error}")
        } else {
            write!(f, "The {kind} with the ID {id} failed: {error}")
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<WriteOutcome>,
    pub failed: Vec<FailedSource>,
}

impl ExportReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, WriteOutcome::Written(_)))
            .count()
    }
}

/// Run one export with an authenticated client.
///
/// Projects are processed before groups, each in ascending ID order. A source
/// that cannot be resolved or listed is skipped with a warning; only failures
/// writing the output abort the run.
pub async fn run(client: &GitLab, options: &ExportOptions) -> ExportResult<ExportReport> {
    let mut report = ExportReport::default();
    let mut projects = Vec::new();
    let mut groups = Vec::new();

    for &id in &options.projects {
        match export_source(client, SourceKind::Project, id, options).await {
            Ok(events) => projects.push(events),
            Err(error) => skip(&mut report, SourceKind::Project, id, error),
        }
    }

    for &id in &options.groups {
        match export_source(client, SourceKind::Group, id, options).await {
            Ok(events) => groups.push(events),
            Err(error) => skip(&mut report, SourceKind::Group, id, error),
        }
    }

    let calendars = match &options.combine {
        Some(name) => vec![NamedEvents::new(name.clone(), merge(&groups, &projects))],
        None => projects.into_iter().chain(groups).collect(),
    };

    report.outcomes = write_all(&calendars, &options.directory)?;
    Ok(report)
}

async fn export_source(
    client: &GitLab,
    kind: SourceKind,
    id: u64,
    options: &ExportOptions,
) -> GitlabResult<NamedEvents> {
    let scope = match kind {
        SourceKind::Project => Scope::Project(client.project(id).await?),
        SourceKind::Group => Scope::Group(client.group(id).await?),
    };

    let events = collect(client, &scope, options.kinds, options.reminder_days).await?;
    info!(
        "Collected {} event(s) from the {kind} \"{}\"",
        events.len(),
        scope.name()
    );

    Ok(NamedEvents::new(scope.name(), events))
}

fn skip(report: &mut ExportReport, kind: SourceKind, id: u64, error: GitlabError) {
    let failed = FailedSource { kind, id, error };
    warn!("{failed}, skipping it");
    report.failed.push(failed);
}

//! Collect calendar events from one project or group.

use std::collections::HashMap;

use tracing::debug;

use crate::error::GitlabResult;
use crate::event::{CalendarEvent, Record, build};
use crate::gitlab::{GitLab, Scope};

/// State filter for issues
pub const ISSUE_STATE: &str = "opened";
/// State filter for milestones
pub const MILESTONE_STATE: &str = "active";

/// Which record kinds to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKinds {
    pub issues: bool,
    pub milestones: bool,
}

impl RecordKinds {
    pub const BOTH: RecordKinds = RecordKinds {
        issues: true,
        milestones: true,
    };

    /// Setting both flags, or neither, selects both kinds.
    pub fn from_flags(only_issues: bool, only_milestones: bool) -> Self {
        if only_issues == only_milestones {
            RecordKinds::BOTH
        } else {
            RecordKinds {
                issues: only_issues,
                milestones: only_milestones,
            }
        }
    }
}

impl Default for RecordKinds {
    fn default() -> Self {
        RecordKinds::BOTH
    }
}

/// List the selected record kinds of `scope` and build an event for every
/// record with a due date.
///
/// Group issues are titled with their owning project's full name, looked up
/// once per project through `client`.
pub async fn collect(
    client: &GitLab,
    scope: &Scope,
    kinds: RecordKinds,
    reminder_days: u32,
) -> GitlabResult<Vec<CalendarEvent>> {
    let mut events = Vec::new();

    if kinds.issues {
        let mut project_names = HashMap::new();
        for issue in client.issues(scope, ISSUE_STATE).await? {
            if issue.due_date.is_none() {
                continue;
            }
            let (record, scope_name) = match scope {
                Scope::Project(project) => (Record::ProjectIssue(issue), project.name.clone()),
                Scope::Group(_) => {
                    let name =
                        owning_project_name(client, &mut project_names, issue.project_id).await?;
                    (Record::GroupIssue(issue), name)
                }
            };
            events.extend(build(&record, &scope_name, reminder_days));
        }
    }

    if kinds.milestones {
        for milestone in client.milestones(scope, MILESTONE_STATE).await? {
            let record = match scope {
                Scope::Project(_) => Record::ProjectMilestone(milestone),
                Scope::Group(_) => Record::GroupMilestone(milestone),
            };
            events.extend(build(&record, scope.name(), reminder_days));
        }
    }

    debug!(scope = scope.name(), events = events.len(), "Collected");
    Ok(events)
}

async fn owning_project_name(
    client: &GitLab,
    cache: &mut HashMap<u64, String>,
    project_id: u64,
) -> GitlabResult<String> {
    if let Some(name) = cache.get(&project_id) {
        return Ok(name.clone());
    }
    let project = client.project(project_id).await?;
    cache.insert(project_id, project.name_with_namespace.clone());
    Ok(project.name_with_namespace)
}

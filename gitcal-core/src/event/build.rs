//! Conversion of GitLab records into calendar events.

use uuid::Uuid;

use super::{CalendarEvent, Record, Reminder};
use crate::gitlab::Issue;

const UID_DOMAIN: &str = "gitcal";

/// Build the calendar event for a record.
///
/// `scope_name` is the owning project's full name for group issues and the
/// queried project or group name otherwise. Returns `None` when the record
/// has no due date.
pub fn build(record: &Record, scope_name: &str, reminder_days: u32) -> Option<CalendarEvent> {
    let start = record.due_date()?;
    let origin = record.origin();

    let description = match record {
        Record::ProjectIssue(issue) | Record::GroupIssue(issue) => issue_description(issue),
        Record::ProjectMilestone(m) | Record::GroupMilestone(m) => {
            m.description.clone().unwrap_or_default()
        }
    };

    let location = record.web_url().to_string();

    Some(CalendarEvent {
        uid: uid(&location),
        name: format!("[{}] {} ({})", scope_name, record.title(), origin.tag()),
        start,
        category: origin.category(),
        description,
        location,
        reminder: (reminder_days > 0).then_some(Reminder {
            days: reminder_days,
        }),
        stamp: record.updated_at(),
    })
}

fn issue_description(issue: &Issue) -> String {
    let description = issue.description.as_deref().unwrap_or_default();
    match &issue.milestone {
        Some(milestone) => format!("From Milestone: {}\n\n{}", milestone.title, description),
        None => description.to_string(),
    }
}

/// Same URL, same UID, so reruns rewrite identical files.
fn uid(location: &str) -> String {
    let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, location.as_bytes());
    format!("{id}@{UID_DOMAIN}")
}

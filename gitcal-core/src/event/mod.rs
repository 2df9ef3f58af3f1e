//! Calendar event types.
//!
//! A `Record` is one GitLab issue or milestone tagged with where it came
//! from; `build` turns it into a `CalendarEvent`, the unit that is merged and
//! written to .ics files.

mod build;

pub use build::build;

use chrono::{DateTime, NaiveDate, Utc};

use crate::gitlab::{Issue, Milestone};

/// Where a record was found. Fixed at collection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    GroupIssue,
    ProjectIssue,
    GroupMilestone,
    ProjectMilestone,
}

impl Origin {
    /// Tag appended to event titles
    pub fn tag(self) -> &'static str {
        match self {
            Origin::GroupIssue => "GROUP_ISSUE",
            Origin::ProjectIssue => "PROJECT_ISSUE",
            Origin::GroupMilestone => "GROUP_MILESTONE",
            Origin::ProjectMilestone => "PROJECT_MILESTONE",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Origin::GroupIssue | Origin::ProjectIssue => Category::Issues,
            Origin::GroupMilestone | Origin::ProjectMilestone => Category::Milestones,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Issues,
    Milestones,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Issues => "Issues",
            Category::Milestones => "Milestones",
        }
    }
}

/// A GitLab record together with its origin.
#[derive(Debug, Clone)]
pub enum Record {
    ProjectIssue(Issue),
    GroupIssue(Issue),
    ProjectMilestone(Milestone),
    GroupMilestone(Milestone),
}

impl Record {
    pub fn origin(&self) -> Origin {
        match self {
            Record::ProjectIssue(_) => Origin::ProjectIssue,
            Record::GroupIssue(_) => Origin::GroupIssue,
            Record::ProjectMilestone(_) => Origin::ProjectMilestone,
            Record::GroupMilestone(_) => Origin::GroupMilestone,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Record::ProjectIssue(issue) | Record::GroupIssue(issue) => &issue.title,
            Record::ProjectMilestone(m) | Record::GroupMilestone(m) => &m.title,
        }
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        match self {
            Record::ProjectIssue(issue) | Record::GroupIssue(issue) => issue.due_date,
            Record::ProjectMilestone(m) | Record::GroupMilestone(m) => m.due_date,
        }
    }

    pub fn web_url(&self) -> &str {
        match self {
            Record::ProjectIssue(issue) | Record::GroupIssue(issue) => &issue.web_url,
            Record::ProjectMilestone(m) | Record::GroupMilestone(m) => &m.web_url,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Record::ProjectIssue(issue) | Record::GroupIssue(issue) => issue.updated_at,
            Record::ProjectMilestone(m) | Record::GroupMilestone(m) => m.updated_at,
        }
    }
}

/// Alarm fired a number of days before the event starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reminder {
    pub days: u32,
}

/// An all-day calendar event derived from one issue or milestone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarEvent {
    /// Stable UID derived from `location`
    pub uid: String,
    /// `[<scope>] <title> (<ORIGIN_TAG>)`
    pub name: String,
    /// Due date; the event covers this whole day
    pub start: NaiveDate,
    pub category: Category,
    pub description: String,
    /// Web URL of the record
    pub location: String,
    pub reminder: Option<Reminder>,
    /// Last update of the record, written as DTSTAMP
    pub stamp: Option<DateTime<Utc>>,
}

impl CalendarEvent {
    /// Business key: events with the same location are the same event.
    pub fn identity(&self) -> &str {
        &self.location
    }

    /// Exclusive end date of the all-day event
    pub fn end(&self) -> NaiveDate {
        self.start.succ_opt().unwrap_or(self.start)
    }
}

/// Events of one calendar, keyed by the name it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEvents {
    pub name: String,
    pub events: Vec<CalendarEvent>,
}

impl NamedEvents {
    pub fn new(name: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        NamedEvents {
            name: name.into(),
            events,
        }
    }
}

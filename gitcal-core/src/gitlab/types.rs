//! GitLab API response types.
//!
//! Only the fields gitcal reads are modeled; everything else in the JSON is
//! ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// The authenticated user (`GET /user`)
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    /// Full name including the namespace, e.g. "Team / Backend"
    pub name_with_namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

/// The milestone embedded in an issue payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MilestoneRef {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Project the issue belongs to (differs per issue when listed for a group)
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub web_url: String,
    #[serde(default)]
    pub milestone: Option<MilestoneRef>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub web_url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Accepts `YYYY-MM-DD` as GitLab sends it, and also full timestamps, whose
/// time of day is dropped.
fn due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_due_date(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid due date '{raw}'")))
}

pub(crate) fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_with_milestone_and_due_date() {
        let issue: Issue = serde_json::from_str(
            r#"{
                "id": 501,
                "iid": 7,
                "project_id": 12,
                "title": "Fix login",
                "description": "Users cannot log in",
                "due_date": "2025-03-20",
                "web_url": "https://gitlab.example.com/team/app/-/issues/7",
                "milestone": {"id": 3, "title": "v1.0", "due_date": "2025-04-01"},
                "updated_at": "2025-03-01T10:15:00.000Z",
                "labels": ["bug"]
            }"#,
        )
        .unwrap();

        assert_eq!(issue.project_id, 12);
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2025, 3, 20));
        assert_eq!(issue.milestone.unwrap().title, "v1.0");
        assert!(issue.updated_at.is_some());
    }

    #[test]
    fn nulls_are_absent() {
        let milestone: Milestone = serde_json::from_str(
            r#"{
                "title": "Someday",
                "description": null,
                "due_date": null,
                "web_url": "https://gitlab.example.com/groups/team/-/milestones/1"
            }"#,
        )
        .unwrap();

        assert_eq!(milestone.description, None);
        assert_eq!(milestone.due_date, None);
    }

    #[test]
    fn due_date_time_of_day_is_dropped() {
        assert_eq!(
            parse_due_date("2025-03-20T23:30:00+02:00"),
            NaiveDate::from_ymd_opt(2025, 3, 20)
        );
        assert_eq!(
            parse_due_date("2025-03-20T08:00:00"),
            NaiveDate::from_ymd_opt(2025, 3, 20)
        );
        assert_eq!(parse_due_date("next week"), None);
    }

    #[test]
    fn malformed_due_date_is_an_error() {
        let result: Result<Milestone, _> = serde_json::from_str(
            r#"{"title": "x", "due_date": "soon", "web_url": "https://example.com"}"#,
        );
        assert!(result.is_err());
    }
}

//! GitLab REST API (v4) client.
//!
//! Covers the handful of endpoints gitcal needs: the current user, a project
//! or group by ID, and the issue and milestone lists of a project or group.
//! List endpoints are followed across all pages.

mod types;

pub use types::{Group, Issue, Milestone, MilestoneRef, Project, User};

use std::fmt;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GitlabError, GitlabResult};

const API_PREFIX: &str = "api/v4";
const PER_PAGE: &str = "100";
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Personal, project or group access token (`PRIVATE-TOKEN` header)
    PrivateToken(String),
    /// OAuth2 token (`Authorization: Bearer`)
    OAuth(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::PrivateToken(_) => f.write_str("PrivateToken(<redacted>)"),
            Auth::OAuth(_) => f.write_str("OAuth(<redacted>)"),
        }
    }
}

/// Everything needed to reach a GitLab instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Base URL of the instance, e.g. `https://gitlab.example.com`
    pub url: String,
    pub auth: Auth,
    pub ssl_verify: bool,
    pub timeout: Option<Duration>,
}

impl Connection {
    pub fn new(url: impl Into<String>, auth: Auth) -> Self {
        Connection {
            url: url.into(),
            auth,
            ssl_verify: true,
            timeout: None,
        }
    }
}

/// A resolved project or group whose issues and milestones can be listed.
#[derive(Debug, Clone)]
pub enum Scope {
    Project(Project),
    Group(Group),
}

impl Scope {
    /// Display name, used in event titles and per-source file names
    pub fn name(&self) -> &str {
        match self {
            Scope::Project(project) => &project.name,
            Scope::Group(group) => &group.name,
        }
    }

    fn api_path(&self) -> String {
        match self {
            Scope::Project(project) => format!("projects/{}", project.id),
            Scope::Group(group) => format!("groups/{}", group.id),
        }
    }
}

/// GitLab API client. Requests are issued one at a time by the caller.
pub struct GitLab {
    http: reqwest::Client,
    api_url: String,
    auth: Auth,
}

impl GitLab {
    pub fn new(connection: &Connection) -> GitlabResult<Self> {
        let base = connection.url.trim_end_matches('/');
        Url::parse(base).map_err(|_| GitlabError::InvalidUrl(connection.url.clone()))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("gitcal/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!connection.ssl_verify);
        if let Some(timeout) = connection.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(GitLab {
            http: builder.build()?,
            api_url: format!("{base}/{API_PREFIX}"),
            auth: connection.auth.clone(),
        })
    }

    /// Check the credentials by fetching the current user.
    pub async fn authenticate(&self) -> GitlabResult<User> {
        self.get("user").await
    }

    pub async fn project(&self, id: u64) -> GitlabResult<Project> {
        self.get(&format!("projects/{id}")).await
    }

    pub async fn group(&self, id: u64) -> GitlabResult<Group> {
        self.get(&format!("groups/{id}")).await
    }

    /// All issues of a project or group in the given state (e.g. "opened").
    pub async fn issues(&self, scope: &Scope, state: &str) -> GitlabResult<Vec<Issue>> {
        self.get_all(&format!("{}/issues", scope.api_path()), state)
            .await
    }

    /// All milestones of a project or group in the given state (e.g. "active").
    pub async fn milestones(&self, scope: &Scope, state: &str) -> GitlabResult<Vec<Milestone>> {
        self.get_all(&format!("{}/milestones", scope.api_path()), state)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> GitlabResult<T> {
        let resp = self.request(path).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Follow `X-Next-Page` until GitLab reports no further page.
    async fn get_all<T: DeserializeOwned>(&self, path: &str, state: &str) -> GitlabResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = Some(String::from("1"));

        while let Some(current) = page {
            debug!(path, page = %current, "Fetching page");
            let resp = self
                .request(path)
                .query(&[
                    ("state", state),
                    ("per_page", PER_PAGE),
                    ("page", current.as_str()),
                ])
                .send()
                .await?;
            let resp = check(resp).await?;

            page = resp
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty() && *value != current)
                .map(String::from);

            let batch: Vec<T> = resp.json().await?;
            items.extend(batch);
        }

        Ok(items)
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let builder = self.http.get(format!("{}/{}", self.api_url, path));
        match &self.auth {
            Auth::PrivateToken(token) => builder.header("PRIVATE-TOKEN", token),
            Auth::OAuth(token) => builder.bearer_auth(token),
        }
    }
}

/// Map non-success statuses to typed errors, keeping GitLab's message.
async fn check(resp: Response) -> GitlabResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    Err(match status {
        StatusCode::UNAUTHORIZED => GitlabError::Unauthorized(message),
        StatusCode::FORBIDDEN => GitlabError::Forbidden(message),
        StatusCode::NOT_FOUND => GitlabError::NotFound(message),
        _ => GitlabError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

/// GitLab errors look like `{"message": "404 Project Not Found"}` or
/// `{"error": "invalid_token"}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value.get("message").or_else(|| value.get("error"))?;
    Some(match field {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

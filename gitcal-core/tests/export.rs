use std::collections::BTreeSet;
use std::fs;

use gitcal_core::collect::RecordKinds;
use gitcal_core::export::{ExportOptions, SourceKind, run};
use gitcal_core::gitlab::{Auth, Connection, GitLab};
use gitcal_core::writer::WriteOutcome;
use mockito::{Matcher, Server, ServerGuard};

async fn mock_json(server: &mut ServerGuard, path: &str, body: &str) {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
}

/// Project 1 has one dated issue, project 2 one dated milestone, project 99
/// does not exist.
async fn mock_instance(server: &mut ServerGuard) {
    mock_json(
        server,
        "/api/v4/projects/1",
        r#"{"id": 1, "name": "P1", "name_with_namespace": "team / P1"}"#,
    )
    .await;
    mock_json(
        server,
        "/api/v4/projects/1/issues",
        r#"[
            {"id": 10, "iid": 1, "project_id": 1, "title": "Fix login",
             "description": "Users cannot log in", "due_date": "2025-03-20",
             "web_url": "https://gitlab.example.com/team/p1/-/issues/1"},
            {"id": 11, "iid": 2, "project_id": 1, "title": "Someday",
             "due_date": null, "web_url": "https://gitlab.example.com/team/p1/-/issues/2"}
        ]"#,
    )
    .await;
    mock_json(server, "/api/v4/projects/1/milestones", "[]").await;

    mock_json(
        server,
        "/api/v4/projects/2",
        r#"{"id": 2, "name": "P2", "name_with_namespace": "team / P2"}"#,
    )
    .await;
    mock_json(server, "/api/v4/projects/2/issues", "[]").await;
    mock_json(
        server,
        "/api/v4/projects/2/milestones",
        r#"[{"id": 20, "iid": 1, "title": "v1.0", "description": "First release",
             "due_date": "2025-06-30",
             "web_url": "https://gitlab.example.com/team/p2/-/milestones/1"}]"#,
    )
    .await;

    server
        .mock("GET", "/api/v4/projects/99")
        .with_status(404)
        .with_body(r#"{"message": "404 Project Not Found"}"#)
        .create_async()
        .await;
}

fn options(directory: &std::path::Path, combine: Option<&str>) -> ExportOptions {
    ExportOptions {
        projects: BTreeSet::from([1, 2, 99]),
        groups: BTreeSet::new(),
        kinds: RecordKinds::BOTH,
        reminder_days: 1,
        combine: combine.map(String::from),
        directory: directory.to_path_buf(),
    }
}

fn client(server: &ServerGuard) -> GitLab {
    GitLab::new(&Connection::new(
        server.url(),
        Auth::PrivateToken("glpat-test".into()),
    ))
    .unwrap()
}

#[tokio::test]
async fn one_file_per_source() {
    let mut server = Server::new_async().await;
    mock_instance(&mut server).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run(&client(&server), &options(dir.path(), None))
        .await
        .unwrap();

    assert_eq!(report.written(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].kind, SourceKind::Project);
    assert_eq!(report.failed[0].id, 99);

    let p1 = fs::read_to_string(dir.path().join("P1.ics")).unwrap();
    assert_eq!(p1.matches("BEGIN:VEVENT").count(), 1);
    assert!(p1.contains("SUMMARY:[P1] Fix login (PROJECT_ISSUE)"));
    assert!(p1.contains("DTSTART;VALUE=DATE:20250320"));
    assert!(p1.contains("CATEGORIES:Issues"));
    assert!(p1.contains("TRIGGER:-P1D"));

    let p2 = fs::read_to_string(dir.path().join("P2.ics")).unwrap();
    assert_eq!(p2.matches("BEGIN:VEVENT").count(), 1);
    assert!(p2.contains("SUMMARY:[P2] v1.0 (PROJECT_MILESTONE)"));
    assert!(p2.contains("CATEGORIES:Milestones"));
}

#[tokio::test]
async fn combined_calendar() {
    let mut server = Server::new_async().await;
    mock_instance(&mut server).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run(&client(&server), &options(dir.path(), Some("All")))
        .await
        .unwrap();

    assert_eq!(
        report.outcomes,
        vec![WriteOutcome::Written(dir.path().join("All.ics"))]
    );
    let all = fs::read_to_string(dir.path().join("All.ics")).unwrap();
    assert_eq!(all.matches("BEGIN:VEVENT").count(), 2);
    assert!(!dir.path().join("P1.ics").exists());
}

#[tokio::test]
async fn reruns_produce_identical_files() {
    let mut server = Server::new_async().await;
    mock_instance(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server);
    let options = options(dir.path(), Some("All"));

    run(&client, &options).await.unwrap();
    let first = fs::read_to_string(dir.path().join("All.ics")).unwrap();
    run(&client, &options).await.unwrap();
    let second = fs::read_to_string(dir.path().join("All.ics")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn nothing_due_writes_nothing() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "/api/v4/groups/7",
        r#"{"id": 7, "name": "quiet"}"#,
    )
    .await;
    mock_json(&mut server, "/api/v4/groups/7/issues", "[]").await;
    mock_json(&mut server, "/api/v4/groups/7/milestones", "[]").await;
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions {
        projects: BTreeSet::new(),
        groups: BTreeSet::from([7]),
        ..options(dir.path(), None)
    };

    let report = run(&client(&server), &options).await.unwrap();

    assert_eq!(
        report.outcomes,
        vec![WriteOutcome::Skipped("quiet.ics".to_string())]
    );
    assert!(!dir.path().join("quiet.ics").exists());
}

#[tokio::test]
async fn skipped_source_reports_the_gitlab_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v4/groups/5")
        .with_status(403)
        .with_body(r#"{"message": "403 Forbidden - secret reason"}"#)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions {
        projects: BTreeSet::new(),
        groups: BTreeSet::from([5]),
        ..options(dir.path(), None)
    };

    let report = run(&client(&server), &options).await.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].kind, SourceKind::Group);
    let message = report.failed[0].to_string();
    assert!(message.contains("group with the ID 5"), "{message}");
    assert!(message.contains("403 Forbidden - secret reason"), "{message}");
    assert!(report.outcomes.is_empty());
}

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;
use uuid::Uuid;

use jobscroll_api::app::{router, AppServices};
use jobscroll_core::{ExperienceLevel, JobId, JobPosting, PageSize};
use jobscroll_infra::InMemoryJobStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(postings: Vec<JobPosting>) -> Self {
        // Same router as prod over a seeded in-memory store, on an ephemeral port.
        let store = Arc::new(InMemoryJobStore::with_postings(postings));
        let app = router(Arc::new(AppServices::in_memory(store, PageSize::DEFAULT)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn get(&self, path_and_query: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.base_url, path_and_query))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path_and_query: &str) -> (StatusCode, serde_json::Value) {
        let res = self.get(path_and_query).await;
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn id(n: u128) -> JobId {
    JobId::from_uuid(Uuid::from_u128(n))
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

// Posting `n` is the n-th newest.
fn ranked(n: u128) -> JobPosting {
    JobPosting::new(id(n), format!("Job {n}"), "Acme", at(1_000 - n as i64))
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::spawn(vec![]).await;
    let (status, body) = srv.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn pages_through_the_feed_with_cursors() {
    let srv = TestServer::spawn((1..=5).map(ranked).collect()).await;

    let (status, first) = srv.get_json("/api/jobs?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&first), vec!["Job 1", "Job 2"]);
    assert_eq!(first["nextCursor"], id(2).to_string());

    let (_, second) = srv
        .get_json(&format!("/api/jobs?limit=2&cursor={}", id(2)))
        .await;
    assert_eq!(titles(&second), vec!["Job 3", "Job 4"]);
    assert_eq!(second["nextCursor"], id(4).to_string());

    let (_, third) = srv
        .get_json(&format!("/api/jobs?limit=2&cursor={}", id(4)))
        .await;
    assert_eq!(titles(&third), vec!["Job 5"]);
    assert!(third.get("nextCursor").is_none());
}

#[tokio::test]
async fn remote_and_salary_filters_combine() {
    let mut remote = JobPosting::new(id(1), "Remote Dev", "Acme", at(10));
    remote.remote = true;
    remote.salary_max = Some(120_000);
    let mut onsite = JobPosting::new(id(2), "Onsite Dev", "Globex", at(20));
    onsite.salary_max = Some(150_000);
    let srv = TestServer::spawn(vec![remote, onsite]).await;

    let (status, body) = srv.get_json("/api/jobs?remote=true&salaryMin=100000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Remote Dev"]);
    assert_eq!(body["jobs"][0]["salaryMax"], 120_000);
    assert_eq!(body["jobs"][0]["remote"], true);
}

#[tokio::test]
async fn lenient_parameters_fall_back_to_no_constraint() {
    let mut onsite = ranked(1);
    onsite.salary_max = None;
    let srv = TestServer::spawn(vec![onsite, ranked(2)]).await;

    // Anything but the literal `true` is not a flag; junk salary is ignored.
    let (status, body) = srv
        .get_json("/api/jobs?remote=yes&verified=1&salaryMin=lots&limit=zero")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Job 1", "Job 2"]);
}

#[tokio::test]
async fn levels_filter_is_case_insensitive_and_skips_empty_segments() {
    let mut senior = ranked(1);
    senior.experience_level = Some(ExperienceLevel::Senior);
    let mut entry = ranked(2);
    entry.experience_level = Some(ExperienceLevel::Entry);
    let unlevelled = ranked(3);
    let srv = TestServer::spawn(vec![senior, entry, unlevelled]).await;

    let (status, body) = srv.get_json("/api/jobs?levels=senior,,MID").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Job 1"]);
    assert_eq!(body["jobs"][0]["experienceLevel"], "SENIOR");
}

#[tokio::test]
async fn search_matches_title_or_company() {
    let mut by_company = ranked(1);
    by_company.company = "RustCorp".into();
    let mut by_title = ranked(2);
    by_title.title = "Senior rust engineer".into();
    let srv = TestServer::spawn(vec![by_company, by_title, ranked(3)]).await;

    let (_, body) = srv.get_json("/api/jobs?search=RUST").await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn inactive_postings_are_never_served() {
    let mut hidden = ranked(1);
    hidden.active = false;
    let srv = TestServer::spawn(vec![hidden, ranked(2)]).await;

    let (_, body) = srv.get_json("/api/jobs").await;
    assert_eq!(titles(&body), vec!["Job 2"]);

    let res = srv.get(&format!("/api/jobs/{}", id(1))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_level_is_a_validation_error() {
    let srv = TestServer::spawn(vec![ranked(1)]).await;
    let (status, body) = srv.get_json("/api/jobs?levels=SENIOR,INTERN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("INTERN"));
}

#[tokio::test]
async fn malformed_and_unknown_cursors_are_rejected() {
    let srv = TestServer::spawn((1..=3).map(ranked).collect()).await;

    let (status, body) = srv.get_json("/api/jobs?cursor=not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_cursor");

    let (status, body) = srv.get_json(&format!("/api/jobs?cursor={}", id(42))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "cursor_not_found");
}

#[tokio::test]
async fn limit_is_defaulted_and_clamped() {
    let srv = TestServer::spawn((1..=120).map(ranked).collect()).await;

    let (_, body) = srv.get_json("/api/jobs").await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 20);

    let (_, body) = srv.get_json("/api/jobs?limit=0").await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 20);

    let (_, body) = srv.get_json("/api/jobs?limit=500").await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 100);
    assert_eq!(body["nextCursor"], id(100).to_string());
}

#[tokio::test]
async fn job_detail_by_id() {
    let srv = TestServer::spawn(vec![ranked(7)]).await;

    let (status, body) = srv.get_json(&format!("/api/jobs/{}", id(7))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Job 7");
    assert_eq!(body["id"], id(7).to_string());

    let res = srv.get(&format!("/api/jobs/{}", id(8))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (status, body) = srv.get_json("/api/jobs/garbage").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}

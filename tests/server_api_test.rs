//! HTTP API tests for the explorer server.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use httpmock::prelude::*;
use metadata_explorer::server::{router, AppState};
use metadata_explorer::{ExplorerEngine, ExplorerSettings};
use serde_json::{json, Value};

const METADATA: &str = "strain\tdate\thost\n\
                        a\t2022-05-01\thuman\n\
                        b\t2022-05-09\tbat\n\
                        c\t2022-06-30\tcamel\n\
                        d\t\thuman\n";

fn create_test_server(settings: ExplorerSettings) -> TestServer {
    let engine = ExplorerEngine::new(settings).unwrap();
    TestServer::new(router(AppState::new(engine))).unwrap()
}

fn upload_form(name: &str, body: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(body.as_bytes().to_vec())
            .file_name(name)
            .mime_type("text/tab-separated-values"),
    )
}

#[tokio::test]
async fn test_index_and_health() {
    let server = create_test_server(ExplorerSettings::default());

    let page = server.get("/").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Nextstrain Metadata Explorer"));

    let health = server.get("/health").await;
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_datasets_endpoint() {
    let server = create_test_server(ExplorerSettings::default());

    let response = server.get("/api/datasets").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let datasets: Value = response.json();
    let datasets = datasets.as_array().unwrap();
    assert_eq!(datasets.len(), 21);
    assert_eq!(datasets[9]["label"], "measles");
}

#[tokio::test]
async fn test_upload_then_plot() {
    let server = create_test_server(ExplorerSettings::default());

    let response = server
        .post("/api/load/upload")
        .multipart(upload_form("metadata.tsv", METADATA))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let loaded: Value = response.json();
    assert_eq!(loaded["summary"]["total_rows"], 4);
    assert_eq!(loaded["summary"]["dropped_rows"], 1);
    assert_eq!(loaded["plot"]["months"], json!(["2022-05", "2022-06"]));
    assert_eq!(loaded["plot"]["series"][0]["counts"], json!([2, 1]));
    assert_eq!(loaded["columns"][3]["label"], "host (n=3)");

    let session = loaded["session_id"].as_str().unwrap();

    let columns: Value = server
        .get(&format!("/api/sessions/{}/columns", session))
        .await
        .json();
    assert_eq!(columns.as_array().unwrap().len(), 4);

    let plot = server
        .get(&format!("/api/sessions/{}/plot", session))
        .add_query_param("color_by", "host")
        .await;
    assert_eq!(plot.status_code(), StatusCode::OK);
    let plot: Value = plot.json();
    assert_eq!(plot["stacked"], true);
    assert_eq!(plot["title"], "Sequences per month colored by 'host'");
    assert_eq!(plot["series"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_upload_without_date_column() {
    let server = create_test_server(ExplorerSettings::default());

    let response = server
        .post("/api/load/upload")
        .multipart(upload_form("bad.tsv", "strain\thost\na\thuman\n"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Metadata must have a date column.");
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let server = create_test_server(ExplorerSettings::default());

    let form = MultipartForm::new().add_text("other", "value");
    let response = server.post("/api/load/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let mut settings = ExplorerSettings::default();
    settings.server.max_upload_mb = 1;
    let server = create_test_server(settings);

    let mut oversized = String::from("date\n");
    while oversized.len() < 2 * 1024 * 1024 {
        oversized.push_str("2020-01-01\n");
    }
    let response = server
        .post("/api/load/upload")
        .multipart(upload_form("huge.tsv", &oversized))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let small = server
        .post("/api/load/upload")
        .multipart(upload_form("metadata.tsv", METADATA))
        .await;
    assert_eq!(small.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_with_repeated_headers() {
    let server = create_test_server(ExplorerSettings::default());
    let body = "date\tc\tc\n2020-01-01\ta\tx\n2020-02-01\tb\ty\n2020-03-01\td\tz\n";

    let loaded: Value = server
        .post("/api/load/upload")
        .multipart(upload_form("dupes.tsv", body))
        .await
        .json();
    let labels: Vec<&str> = loaded["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"c (n=3)"));
    assert!(labels.contains(&"c.1 (n=3)"));

    let session = loaded["session_id"].as_str().unwrap();
    let plot: Value = server
        .get(&format!("/api/sessions/{}/plot", session))
        .add_query_param("color_by", "c.1")
        .await
        .json();
    let names: Vec<&str> = plot["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["x", "y", "z"]);
}

#[tokio::test]
async fn test_upload_with_overlong_row() {
    let server = create_test_server(ExplorerSettings::default());

    let response = server
        .post("/api/load/upload")
        .multipart(upload_form("wide.tsv", "date\tc\n2020-01-01\ta\tx\n"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_load_url_endpoint() {
    let upstream = MockServer::start();
    let mock = upstream.mock(|when, then| {
        when.method(GET).path("/metadata.tsv");
        then.status(200).body(METADATA);
    });
    let server = create_test_server(ExplorerSettings::default());

    let response = server
        .post("/api/load/url")
        .json(&json!({ "url": upstream.url("/metadata.tsv") }))
        .await;

    mock.assert();
    assert_eq!(response.status_code(), StatusCode::OK);
    let loaded: Value = response.json();
    assert_eq!(loaded["summary"]["valid_rows"], 3);
    assert_eq!(loaded["source"], upstream.url("/metadata.tsv"));
}

#[tokio::test]
async fn test_load_url_errors() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/missing.tsv");
        then.status(404);
    });
    let server = create_test_server(ExplorerSettings::default());

    let bad_scheme = server
        .post("/api/load/url")
        .json(&json!({ "url": "ftp://example.org/metadata.tsv" }))
        .await;
    assert_eq!(bad_scheme.status_code(), StatusCode::BAD_REQUEST);

    let missing = server
        .post("/api/load/url")
        .json(&json!({ "url": upstream.url("/missing.tsv") }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_session_and_column() {
    let server = create_test_server(ExplorerSettings::default());

    let response = server.get("/api/sessions/does-not-exist/plot").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let loaded: Value = server
        .post("/api/load/upload")
        .multipart(upload_form("metadata.tsv", METADATA))
        .await
        .json();
    let session = loaded["session_id"].as_str().unwrap();

    let response = server
        .get(&format!("/api/sessions/{}/plot", session))
        .add_query_param("color_by", "lineage")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

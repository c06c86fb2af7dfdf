mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use proposal_pipeline::domain::ProposalOptions;
use proposal_pipeline::infrastructure::observability::REQUEST_ID_HEADER;
use proposal_pipeline::presentation::{AppState, Settings, create_router};

use common::{Fakes, RENDERED_BYTES, STATEMENT_TEXT, TestPipeline};

const BOUNDARY: &str = "proposal-test-boundary";

fn create_test_app(pipeline: &TestPipeline) -> axum::Router {
    create_router(AppState {
        job_service: pipeline.job_service.clone(),
        settings: Settings::default(),
    })
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    for (filename, content_type, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn create_job_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/jobs")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const VALID_FIELDS: &[(&str, &str)] = &[
    ("business_name", "Corner Bakery"),
    ("website", "cornerbakery.example"),
    ("owner_id", "user-1"),
    ("organization_id", "org-1"),
    ("include_images", "false"),
];

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn given_valid_upload_when_creating_job_then_returns_accepted_with_job_id() {
    let mut pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let body = multipart_body(VALID_FIELDS, &[("march.txt", "text/plain", STATEMENT_TEXT)]);

    let response = app.oneshot(create_job_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = json_body(response).await;
    assert_eq!(json["status"], "pending");
    let queued = pipeline.receiver.try_recv().unwrap();
    assert_eq!(json["job_id"], queued.job_id.to_string());

    let job = pipeline.job_service.get_job_status(queued.job_id).await.unwrap();
    assert!(!job.input.options.include_images);
    assert!(job.input.options.include_narrative);
    assert_eq!(job.input.merchant.website.as_deref(), Some("cornerbakery.example"));
}

#[tokio::test]
async fn given_missing_owner_when_creating_job_then_returns_bad_request() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let body = multipart_body(
        &[("business_name", "Corner Bakery"), ("organization_id", "org-1")],
        &[("march.txt", "text/plain", STATEMENT_TEXT)],
    );

    let response = app.oneshot(create_job_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "owner_id is required");
}

#[tokio::test]
async fn given_no_document_when_creating_job_then_returns_bad_request() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);

    let response = app
        .oneshot(create_job_request(multipart_body(VALID_FIELDS, &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unsupported_file_when_creating_job_then_returns_unsupported_media_type() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let body = multipart_body(VALID_FIELDS, &[("logo.png", "image/png", "not an image")]);

    let response = app.oneshot(create_job_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn given_invalid_flag_when_creating_job_then_returns_bad_request() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let mut fields = VALID_FIELDS.to_vec();
    fields.push(("include_narrative", "maybe"));
    let body = multipart_body(&fields, &[("march.txt", "text/plain", STATEMENT_TEXT)]);

    let response = app.oneshot(create_job_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_malformed_job_id_when_getting_status_then_returns_bad_request() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);

    let response = app.oneshot(get("/api/v1/jobs/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_job_when_getting_status_then_returns_not_found() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let uri = format!("/api/v1/jobs/{}", uuid::Uuid::new_v4());

    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_completed_job_when_getting_status_then_returns_steps_and_document_reference() {
    let pipeline = TestPipeline::new(Fakes::default());
    let job = pipeline.run(STATEMENT_TEXT, ProposalOptions::default()).await;
    let uri = format!("/api/v1/jobs/{}", job.id);

    let first = create_test_app(&pipeline).oneshot(get(&uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_bytes = to_bytes(first.into_body(), usize::MAX).await.unwrap();
    let second = create_test_app(&pipeline).oneshot(get(&uri)).await.unwrap();
    let second_bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    assert_eq!(first_bytes, second_bytes);

    let json: Value = serde_json::from_slice(&first_bytes).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["steps"].as_array().unwrap().len(), 7);
    assert_eq!(json["steps"][0]["step"], "parse_statements");
    assert_eq!(json["steps"][6]["status"], "completed");
    assert_eq!(
        json["artifacts"]["document"]["download_url"],
        format!("/api/v1/jobs/{}/document", job.id)
    );
    assert!(json["artifacts"]["document"].get("storage_path").is_none());
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn given_pending_job_when_downloading_then_returns_conflict() {
    let pipeline = TestPipeline::new(Fakes::default());
    let job_id = pipeline.submit(STATEMENT_TEXT, ProposalOptions::default()).await;
    let app = create_test_app(&pipeline);

    let response = app
        .oneshot(get(&format!("/api/v1/jobs/{}/document", job_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn given_completed_job_when_downloading_then_returns_document_bytes() {
    let pipeline = TestPipeline::new(Fakes::default());
    let job = pipeline.run(STATEMENT_TEXT, ProposalOptions::default()).await;
    let app = create_test_app(&pipeline);

    let response = app
        .oneshot(get(&format!("/api/v1/jobs/{}/document", job.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("corner-bakery-proposal.pdf")
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], RENDERED_BYTES);
}

#[tokio::test]
async fn given_unknown_job_when_downloading_then_returns_not_found() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);

    let response = app
        .oneshot(get(&format!("/api/v1/jobs/{}/document", uuid::Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_request_id_header_when_calling_api_then_it_is_echoed() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
}

#[tokio::test]
async fn given_no_request_id_when_calling_api_then_one_is_generated() {
    let pipeline = TestPipeline::new(Fakes::default());
    let app = create_test_app(&pipeline);

    let response = app.oneshot(get("/health")).await.unwrap();

    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/rank", post(handlers::handle_rank))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/taxonomy", get(handlers::handle_taxonomy))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::matching::batch::{BatchOptions, BatchOrchestrator};
    use crate::matching::hybrid::ScoringWeights;
    use crate::matching::similarity::CosineSimilarity;
    use crate::matching::taxonomy::{Taxonomy, TaxonomyEntry};

    const BOUNDARY: &str = "ranker-test-boundary";
    const UPLOAD_LIMIT: usize = 4 * 1024;

    fn test_state() -> AppState {
        let taxonomy = Taxonomy::new(vec![
            TaxonomyEntry::new("Python", &[]),
            TaxonomyEntry::new("SQL", &[]),
            TaxonomyEntry::new("Docker", &[]),
        ])
        .unwrap();
        let config = Config {
            weights: ScoringWeights::new(1.0, 0.0).unwrap(),
            max_upload_bytes: UPLOAD_LIMIT,
            ..Config::default()
        };
        AppState {
            orchestrator: BatchOrchestrator::new(
                Arc::new(taxonomy),
                Arc::new(CosineSimilarity),
                BatchOptions::default(),
            ),
            config,
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(f) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_taxonomy_size() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["taxonomy_size"], 3);
    }

    #[tokio::test]
    async fn test_rank_returns_ranked_report() {
        let (status, body) = send(json_request(
            "/api/v1/rank",
            json!({
                "job_description": "We need Python and SQL experience",
                "resumes": [
                    {"name": "B", "text": "No relevant background"},
                    {"name": "A", "text": "Skilled in Python and Docker"}
                ]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["required_skills"], json!(["Python", "SQL"]));
        assert_eq!(body["ranked"][0]["resume"], "A");
        assert_eq!(body["ranked"][0]["rank"], 1);
        assert_eq!(body["ranked"][0]["hybrid_score"], 50);
        assert_eq!(body["ranked"][0]["missing_skills"], json!(["SQL"]));
        assert_eq!(body["ranked"][1]["resume"], "B");
        assert_eq!(body["errors"], json!([]));
    }

    #[tokio::test]
    async fn test_rank_accepts_weight_override() {
        let (status, body) = send(json_request(
            "/api/v1/rank",
            json!({
                "job_description": "Python",
                "resumes": [{"name": "A", "text": "Python"}],
                "weights": {"skill_weight": 0.0, "text_weight": 1.0}
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weights"]["text_weight"], 1.0);
        assert_eq!(body["ranked"][0]["hybrid_score"], 100);
    }

    #[tokio::test]
    async fn test_rank_rejects_empty_resume_list() {
        let (status, body) = send(json_request(
            "/api/v1/rank",
            json!({"job_description": "Python", "resumes": []}),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rank_rejects_bad_weights() {
        let (status, body) = send(json_request(
            "/api/v1/rank",
            json!({
                "job_description": "Python",
                "resumes": [{"name": "A", "text": "Python"}],
                "weights": {"skill_weight": 0.9, "text_weight": 0.9}
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid weights"));
    }

    #[tokio::test]
    async fn test_rank_malformed_json_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/rank")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rank_oversized_body_is_rejected() {
        let (status, body) = send(json_request(
            "/api/v1/rank",
            json!({
                "job_description": "Python",
                "resumes": [{"name": "A", "text": "python ".repeat(UPLOAD_LIMIT)}]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_match_oversized_upload_is_rejected() {
        let big = "python ".repeat(UPLOAD_LIMIT);
        let request = multipart_request(&[
            ("job_description", None, &b"Python"[..]),
            ("files", Some("big.txt"), big.as_bytes()),
        ]);
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_match_without_multipart_content_type_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("Python"))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_upload_isolates_unreadable_file() {
        let request = multipart_request(&[
            ("job_description", None, &b"We need Python and SQL experience"[..]),
            ("files", Some("a.txt"), &b"Skilled in Python and Docker"[..]),
            ("files", Some("scan.pdf"), &[0x25u8, 0x50, 0x44, 0x46, 0xff, 0xfe][..]),
            ("files", Some("b.txt"), &b"Python and SQL daily"[..]),
        ]);
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ranked"][0]["resume"], "b.txt");
        assert_eq!(body["ranked"][1]["resume"], "a.txt");
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
        assert_eq!(body["errors"][0]["resume"], "scan.pdf");
        assert_eq!(body["errors"][0]["kind"], "extraction_failure");
    }

    #[tokio::test]
    async fn test_match_requires_job_description() {
        let request = multipart_request(&[("file", Some("a.txt"), &b"Python"[..])]);
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_taxonomy_lists_entries_in_order() {
        let request = Request::builder()
            .uri("/api/v1/taxonomy")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["size"], 3);
        assert_eq!(body["entries"][0]["canonical"], "Python");
        assert_eq!(body["entries"][2]["canonical"], "Docker");
    }
}

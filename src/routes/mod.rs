//! Route modules for the GROBID parse server

pub mod health;
pub mod parse;

use axum::Router;

use crate::state::AppState;

/// All routes with state applied. Middleware layers are added by the caller.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(parse::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::grobid::MockGrobid;
    use crate::index::MemoryIndex;
    use crate::pipeline::{ParsePipeline, PipelineSettings};
    use crate::storage::MemoryObjectStore;

    const TEI: &str = "<TEI><text>parsed</text></TEI>";

    struct TestApp {
        router: Router,
        objects: Arc<MemoryObjectStore>,
        index: Arc<MemoryIndex>,
        grobid: Arc<MockGrobid>,
    }

    fn test_app_with(grobid: MockGrobid, configure: impl FnOnce(&mut Config)) -> TestApp {
        let mut config = Config::default();
        config.storage.pdf_bucket = "pdfs".to_string();
        config.storage.xml_bucket = "xml".to_string();
        config.disk.path = std::env::temp_dir();
        configure(&mut config);

        let objects = Arc::new(MemoryObjectStore::with_buckets(&["pdfs", "xml"]));
        let index = Arc::new(MemoryIndex::new());
        let grobid = Arc::new(grobid);
        let pipeline = ParsePipeline::new(
            objects.clone(),
            index.clone(),
            grobid.clone(),
            PipelineSettings::from(&config),
        );

        TestApp {
            router: app(AppState::new(config, pipeline)),
            objects,
            index,
            grobid,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(MockGrobid::returning(TEI), |_| {})
    }

    fn parse_body(pdf_uuid: &str) -> Value {
        json!({
            "url": "https://example.org/paper.pdf",
            "pdf_uuid": pdf_uuid,
            "native_id": " 10.1234/ABC ",
            "native_id_namespace": "doi"
        })
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_parse_created() {
        let app = test_app();
        app.objects.insert("pdfs", "abc.pdf", b"%PDF-1.4".to_vec()).await;

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("abc"))).await;

        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["status"], "success");
        assert_eq!(body["xml_content"], TEI);
        assert_eq!(body["s3_key"], format!("{}.xml.gz", id));
        assert_eq!(body["s3_path"], format!("s3://xml/{}.xml.gz", id));

        let records = app.index.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].native_id, "10.1234/abc");
        assert_eq!(app.objects.object_count("xml").await, 1);

        let (status, stored) = send(&app.router, Method::GET, &format!("/parse/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["xml_content"], TEI);
        assert_eq!(stored["source_pdf_id"], "abc");
        assert_eq!(stored["s3_key"], format!("{}.xml.gz", id));
    }

    #[tokio::test]
    async fn test_parse_accepts_pdf_key() {
        let app = test_app();
        app.objects.insert("pdfs", "k1.pdf", b"%PDF".to_vec()).await;

        let body = json!({
            "url": "u",
            "pdf_key": "k1",
            "native_id": "n",
            "native_id_namespace": "ns"
        });
        let (status, _) = send(&app.router, Method::POST, "/parse", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_parse_with_both_source_fields() {
        let app = test_app();
        app.objects.insert("pdfs", "abc.pdf", b"%PDF".to_vec()).await;

        let mut body = parse_body("abc");
        body["pdf_key"] = json!("stale");
        let (status, created) = send(&app.router, Method::POST, "/parse", Some(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();
        let (_, stored) = send(&app.router, Method::GET, &format!("/parse/{}", id), None).await;
        assert_eq!(stored["source_pdf_id"], "abc");
    }

    #[tokio::test]
    async fn test_parse_missing_pdf_key_named() {
        let app = test_app();

        let body = json!({
            "url": "u",
            "pdf_key": " ",
            "native_id": "n",
            "native_id_namespace": "ns"
        });
        let (status, body) = send(&app.router, Method::POST, "/parse", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: pdf_key");
    }

    #[tokio::test]
    async fn test_parse_missing_fields() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/parse",
            Some(json!({ "url": "https://example.org/x.pdf", "native_id": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing required fields: pdf_uuid, native_id, native_id_namespace"
        );
        assert_eq!(app.grobid.call_count(), 0);
        assert!(app.index.records().await.is_empty());
        assert_eq!(app.objects.object_count("xml").await, 0);
    }

    #[tokio::test]
    async fn test_parse_invalid_json() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/parse")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_pdf_not_found() {
        let app = test_app();

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("missing"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "PDF not found in S3 bucket: pdfs");
        assert_eq!(app.grobid.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_too_large() {
        let app = test_app_with(MockGrobid::returning(TEI), |config| {
            config.parse.max_file_size_mb = 1
        });
        app.objects.insert("pdfs", "big.pdf", vec![0; 2 * 1024 * 1024]).await;

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("big"))).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File is too large. Max file size is 1mb.");
        assert_eq!(app.grobid.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_empty_pdf() {
        let app = test_app();
        app.objects.insert("pdfs", "empty.pdf", Vec::new()).await;

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("empty"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "PDF is empty.");
    }

    #[tokio::test]
    async fn test_parse_grobid_error() {
        let app = test_app_with(MockGrobid::failing(503, "busy"), |_| {});
        app.objects.insert("pdfs", "abc.pdf", b"%PDF".to_vec()).await;

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("abc"))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("busy"));
    }

    #[tokio::test]
    async fn test_parse_duplicate_conflict() {
        let app = test_app_with(MockGrobid::returning(TEI), |config| {
            config.parse.duplicate_check = true
        });
        app.objects.insert("pdfs", "abc.pdf", b"%PDF".to_vec()).await;

        let (status, first) = send(&app.router, Method::POST, "/parse", Some(parse_body("abc"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let first_id = first["id"].as_str().unwrap();

        let (status, body) = send(&app.router, Method::POST, "/parse", Some(parse_body("abc"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            format!("PDF has already been parsed with id: {}", first_id)
        );
        assert_eq!(app.index.records().await.len(), 1);
        assert_eq!(app.objects.object_count("xml").await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_extraction() {
        let app = test_app();
        let (status, body) = send(&app.router, Method::GET, "/parse/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No extraction found with id: nope");
    }

    #[tokio::test]
    async fn test_grobid_health() {
        let app = test_app();
        let (status, body) = send(&app.router, Method::GET, "/grobid-health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "alive" }));

        let mut dead = MockGrobid::returning(TEI);
        dead.alive = false;
        let app = test_app_with(dead, |_| {});
        let (status, body) = send(&app.router, Method::GET, "/grobid-health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "dead" }));
    }

    #[tokio::test]
    async fn test_liveness_ok() {
        let app = test_app_with(MockGrobid::returning(TEI), |config| {
            config.disk.degraded_percent = 0.0
        });
        let (status, body) = send(&app.router, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["disk"]["total_bytes"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_liveness_degraded_on_low_disk() {
        let app = test_app_with(MockGrobid::returning(TEI), |config| {
            config.disk.degraded_percent = 101.0
        });
        let (status, body) = send(&app.router, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_liveness_degraded_when_disk_unreadable() {
        let app = test_app_with(MockGrobid::returning(TEI), |config| {
            config.disk.path = "/definitely/not/here".into()
        });
        let (status, body) = send(&app.router, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert!(body.get("disk").is_none());
    }
}

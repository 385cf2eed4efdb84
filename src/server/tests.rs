use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};

use super::*;
use crate::disposable::DisposableFilter;
use crate::front::{Front, WorkerPool};
use crate::mx::MxHost;
use crate::mx::tests::StubResolver;
use crate::pipeline::Pipeline;
use crate::stream::BatchOptions;
use crate::testutil::{LoopbackServer, client};
use crate::validator::SyntaxMode;

fn worker_state() -> WorkerState {
    let resolver = StubResolver::new(|domain| match domain {
        "nodomain.example" => Ok(Vec::new()),
        _ => Ok(vec![MxHost::new(10, "mx.invalid")]),
    });
    WorkerState {
        pipeline: Arc::new(
            Pipeline::builder()
                .syntax(SyntaxMode::Permissive)
                .disposable(DisposableFilter::builtin())
                .resolver(Arc::new(resolver))
                .build(),
        ),
        batch: BatchOptions {
            pacing: Duration::ZERO,
            ..BatchOptions::default()
        },
        default_proxy: None,
    }
}

fn front_state(workers: Vec<String>) -> FrontState {
    FrontState {
        front: Front::new(
            WorkerPool::new(workers, client()),
            SyntaxMode::Permissive,
            DisposableFilter::builtin(),
        ),
        default_proxy: None,
    }
}

async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

#[actix_web::test]
async fn worker_streams_one_event_per_line() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(worker_state()))
            .configure(worker_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/verify")
        .insert_header(("Content-Type", "text/csv"))
        .set_payload("not-an-email\n\nuser@mailinator.com\nuser@nodomain.example\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let body = test::read_body(resp).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        concat!(
            "data: {\"email\":\"not-an-email\",\"status\":\"Invalid Syntax\"}\n\n",
            "data: {\"email\":\"user@mailinator.com\",\"status\":\"Invalid (Disposable)\"}\n\n",
            "data: {\"email\":\"user@nodomain.example\",\"status\":\"Invalid Domain\"}\n\n",
        )
    );
}

#[actix_web::test]
async fn worker_rejects_empty_upload() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(worker_state()))
            .configure(worker_routes),
    )
    .await;
    let req = test::TestRequest::post().uri("/verify").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "invalid upload: no upload supplied");
}

#[actix_web::test]
async fn worker_rejects_bad_proxy_field() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(worker_state()))
            .configure(worker_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/verify?proxy=no-port-here")
        .set_payload("a@b.co\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn index_reports_role() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(front_state(Vec::new())))
            .configure(front_routes),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "mailprobe front is running");
}

#[actix_web::test]
async fn front_answers_disposable_batch_alone() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(front_state(Vec::new())))
            .configure(front_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_payload("a@mailinator.com\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(
        body,
        "data: {\"email\":\"a@mailinator.com\",\"status\":\"Invalid (Disposable)\"}\n\n"
    );
}

#[actix_web::test]
async fn front_relays_worker_stream() {
    let worker = LoopbackServer::start(
        "200 OK",
        "text/event-stream",
        "data: {\"email\":\"b@example.com\",\"status\":\"Valid\"}\n\n",
    )
    .await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(front_state(vec![worker.base_url.clone()])))
            .configure(front_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_payload("b@example.com\nx@yopmail.com\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        concat!(
            "data: {\"email\":\"x@yopmail.com\",\"status\":\"Invalid (Disposable)\"}\n\n",
            "data: {\"email\":\"b@example.com\",\"status\":\"Valid\"}\n\n",
        )
    );
}

#[actix_web::test]
async fn front_unreachable_workers_is_bad_gateway() {
    let dead = format!("http://127.0.0.1:{}", closed_port().await);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(front_state(vec![dead])))
            .configure(front_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_payload("b@example.com\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn proxy_test_requires_an_address() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(worker_state()))
            .configure(worker_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/test-proxy")
        .set_json(serde_json::json!({"proxyUser": "u"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/test-proxy")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["status"].as_str().unwrap().starts_with("malformed request body"));
}

#[actix_web::test]
async fn proxy_test_reports_failure_as_bad_request() {
    let port = closed_port().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(front_state(Vec::new())))
            .configure(front_routes),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/test-proxy")
        .set_json(serde_json::json!({"proxy": format!("127.0.0.1:{port}")}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["status"].as_str().unwrap().starts_with("Proxy connection failed"));
}

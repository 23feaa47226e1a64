//! End-to-end tests over a real listener.

use std::collections::HashSet;
use std::time::Duration;

use hello_service::config::AppConfig;
use hello_service::lifecycle::ResourceState;
use serde_json::Value;

mod common;

#[tokio::test]
async fn serves_every_route_over_tcp() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let res = app.client.get(app.url("/health/ready")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["http_client"], "healthy");
    assert_eq!(body["checks"]["application"], "healthy");

    let res = app
        .client
        .get(app.url("/api/v1/hello/world"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let id = res.headers()["x-request-id"].to_str().unwrap().to_owned();
    assert_eq!(id.len(), 8);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Hello, World!");
    assert_eq!(body["status"], "success");

    let res = app.client.get(app.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert!(res.headers().contains_key("x-request-id"));

    let res = app.client.get(app.url("/metrics")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let text = res.text().await.unwrap();
    assert!(text.contains("http_requests_total"));

    app.shutdown.trigger();
    app.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_drains_and_closes_resources() {
    let app = common::spawn_app().await;
    assert_eq!(app.resources.state(), ResourceState::Ready);

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    app.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), app.handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    assert_eq!(app.resources.state(), ResourceState::Closed);
    assert!(app.resources.try_client().is_none());
}

#[tokio::test]
async fn concurrent_requests_get_distinct_ids() {
    let app = common::spawn_app().await;
    let concurrency = 10;
    let requests_per_task = 10;

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = app.client.clone();
        let url = app.url("/api/v1/hello/world");
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..requests_per_task {
                let res = client.get(&url).send().await.unwrap();
                assert_eq!(res.status(), 200);
                ids.push(res.headers()["x-request-id"].to_str().unwrap().to_owned());
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for task in tasks {
        for id in task.await.unwrap() {
            seen.insert(id);
        }
    }
    assert_eq!(seen.len(), concurrency * requests_per_task);

    app.shutdown.trigger();
    app.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn custom_prefix_moves_the_greeting() {
    let mut config = AppConfig::default();
    config.api.prefix = "/v2".into();
    let app = common::spawn_app_with(config).await;

    let res = app.client.get(app.url("/v2/hello/world")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = app
        .client
        .get(app.url("/api/v1/hello/world"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    app.shutdown.trigger();
    app.handle.await.unwrap().unwrap();
}

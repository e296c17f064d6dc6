use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use estate_hub::marketplace::Marketplace;
use serde_json::json;

pub(crate) fn with_marketplace_routes(market: &Marketplace) -> Router {
    market
        .router()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::seed_demo_catalog;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use estate_hub::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
    use estate_hub::workflows::memory::{InMemoryStore, RecordingLiveChannel};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> (Router, Marketplace) {
        let market = Marketplace::in_memory(
            &InMemoryStore::new(),
            Arc::new(RecordingLiveChannel::new()),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_marketplace_routes(&market).layer(Extension(state));
        (router, market)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let (router, _) = app(false);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");

        let (router, _) = app(true);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_prometheus_text() {
        let (router, _) = app(true);
        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|value| value.as_bytes()),
            Some("text/plain; version=0.0.4".as_bytes())
        );
    }

    #[tokio::test]
    async fn marketplace_routes_are_mounted() {
        let (router, market) = app(true);
        seed_demo_catalog(&market).expect("catalog seeded");

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/properties")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(3));

        let response = router
            .oneshot(
                Request::get("/api/notifications")
                    .header(USER_ID_HEADER, "client-a")
                    .header(USER_ROLE_HEADER, "client")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

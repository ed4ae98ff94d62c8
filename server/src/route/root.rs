use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub trait RootRouter {
    fn route_root(self) -> Self;
}

impl<S> RootRouter for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn route_root(self) -> Self {
        self.route("/", get(banner)).route("/health", get(health))
    }
}

async fn banner() -> Json<Value> {
    Json(json!({
        "message": "Book catalog API",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod test {
    use super::RootRouter;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(uri: &str) -> (StatusCode, Value) {
        let response = Router::<()>::new()
            .route_root()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn banner_reports_online() {
        let (status, body) = call("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_is_healthy() {
        let (status, body) = call("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}

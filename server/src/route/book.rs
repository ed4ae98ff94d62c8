use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, DeleteBookRequest, GetAllBookRequest, GetBookRequest, UpdateBookRequest,
    UpsertBookRequest,
};
use crate::response::BookPresenter;
use application::service::{
    DeleteBookService, GetBookService, ReconcileBookService, UpdateBookService,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/records",
            get(
                |State(module): State<AppModule>,
                 WithRejection(Query(req), _): WithRejection<Query<GetAllBookRequest>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().get_all_books(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 WithRejection(Json(req), _): WithRejection<Json<UpsertBookRequest>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().reconcile_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/records/strict",
            post(
                |State(module): State<AppModule>,
                 WithRejection(Json(req), _): WithRejection<Json<UpsertBookRequest>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book_strict(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/records/:id",
            get(
                |State(module): State<AppModule>,
                 WithRejection(Path(id), _): WithRejection<Path<i64>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 WithRejection(Path(id), _): WithRejection<Path<i64>, ErrorStatus>,
                 WithRejection(Json(req), _): WithRejection<Json<UpdateBookRequest>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.database().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 WithRejection(Path(id), _): WithRejection<Path<i64>, ErrorStatus>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use super::BookRouter;
    use crate::handler::AppModule;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use kernel::KernelError;
    use rand::distributions::{Alphanumeric, DistString};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn router() -> error_stack::Result<Router, KernelError> {
        Ok(Router::<AppModule>::new().route_book().with_state(AppModule::new().await?))
    }

    fn random_isbn() -> String {
        Alphanumeric.sample_string(&mut rand::thread_rng(), 20)
    }

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn reconcile_then_delete() -> error_stack::Result<(), KernelError> {
        let router = router().await?;
        let isbn = random_isbn();

        let body = json!({ "title": "A", "author": "X", "isbn": isbn }).to_string();
        let (status, created) = call(&router, Method::POST, "/records", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(created["updated_at"].is_null());

        let body = json!({ "title": "A2", "author": "X", "isbn": isbn }).to_string();
        let (status, updated) = call(&router, Method::POST, "/records", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["title"], "A2");

        let uri = format!("/records/{}", created["id"]);
        let (status, deleted) = call(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Book 'A2' deleted");

        let (status, body) = call(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].is_string());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn strict_create_refuses_a_known_isbn() -> error_stack::Result<(), KernelError> {
        let router = router().await?;
        let body = json!({ "title": "A", "author": "X", "isbn": random_isbn() }).to_string();

        let (status, created) = call(&router, Method::POST, "/records/strict", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, rejected) = call(&router, Method::POST, "/records/strict", Some(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rejected["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("already exists")));

        let uri = format!("/records/{}", created["id"]);
        let (status, _) = call(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn malformed_requests_are_unprocessable() -> error_stack::Result<(), KernelError> {
        let router = router().await?;

        let (status, body) = call(&router, Method::POST, "/records", Some("{\"title\": ")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());

        let (status, _) = call(&router, Method::POST, "/records", Some("{\"title\": \"A\"}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body = json!({ "title": "  ", "author": "X" }).to_string();
        let (status, _) = call(&router, Method::POST, "/records", Some(&body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&router, Method::GET, "/records/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&router, Method::GET, "/records?limit=ten", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&router, Method::GET, "/records?skip=-1", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        Ok(())
    }
}

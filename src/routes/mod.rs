use axum::Router;
use tower_cookies::CookieManagerLayer;

use crate::setup::AppState;

mod auth;
mod health_check;
mod role_routes;
mod swagger;
mod user_routes;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health_check::route())
        .merge(swagger::route())
        .merge(role_routes::route())
        .merge(auth::route())
        .merge(user_routes::route())
}

pub fn app(state: AppState) -> Router {
    routes()
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::setup::AppState;

    // None of the requests below reach the database.
    fn test_app() -> Router {
        let connection_pool = PgPoolOptions::new()
            .connect_lazy("postgres://ngmanager@localhost/ngmanager")
            .unwrap();
        super::app(AppState { connection_pool })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn live() {
        let (status, body) = send(get("/live")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn role_catalogue_is_ordered_by_level() {
        let (status, body) = send(get("/roles")).await;
        assert_eq!(status, StatusCode::OK);
        let roles: Vec<Value> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = roles.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(
            ids,
            vec!["recrue", "membre", "officier", "gouverneur", "staff", "fondateur"]
        );
        let founder_permissions = roles[5]["permissions"].as_array().unwrap();
        assert_eq!(founder_permissions.len(), 18);
    }

    #[tokio::test]
    async fn role_by_id_ignores_case() {
        let (status, body) = send(get("/roles/STAFF")).await;
        assert_eq!(status, StatusCode::OK);
        let role: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(role["id"], "staff");
        assert_eq!(role["level"], 80);

        let (status, _) = send(get("/roles/emperor")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn role_level_gaps_are_not_found() {
        let (status, body) = send(get("/roles/level/60")).await;
        assert_eq!(status, StatusCode::OK);
        let role: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(role["name"], "Gouverneur");

        let (status, _) = send(get("/roles/level/50")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_listing_requires_credentials() {
        let (status, _) = send(get("/users")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unsupported_auth_scheme_is_rejected() {
        let request = Request::builder()
            .uri("/users/me")
            .header(header::AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn role_change_requires_credentials() {
        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/users/0191f6a0-7c6e-7c3a-9d2b-5b6f0c1e2d3f/role")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"role": "staff"}"#))
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_without_token_is_a_bad_request() {
        let (status, _) = send(get("/auth/clear")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_rejects_invalid_input_before_storage() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"username": "gouv", "email": "gouv@ng.fr", "password": "short"}"#,
            ))
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

//! Link Store Proxy: relays link reads, posts and votes to remote backends.

use axum::Router;

pub mod backends;
pub mod dto;
pub mod handlers;
pub mod services;

pub use backends::LinkBackends;

pub fn router(backends: LinkBackends) -> Router {
    handlers::link_routes().with_state(backends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn post_form_redirects_home() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = router(LinkBackends::new(vec![server.uri()], reqwest::Client::new()));
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/post")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("url=http%3A%2F%2Fa.com&title=A"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn missing_title_is_bad_request() {
        let app = router(LinkBackends::new(
            vec!["http://127.0.0.1:9".into()],
            reqwest::Client::new(),
        ));
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/post")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("url=http%3A%2F%2Fa.com"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn index_returns_ranked_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Links": [{ "ID": 1, "URL": "http://a.com", "Title": "A", "Points": 0 }]
            })))
            .mount(&server)
            .await;

        let app = router(LinkBackends::new(vec![server.uri()], reqwest::Client::new()));
        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body[0]["rank"], 1);
        assert_eq!(body[0]["title"], "A");
    }
}

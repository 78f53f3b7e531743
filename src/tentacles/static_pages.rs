use axum::{
    http::{Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

pub const INDEX_HTML: &str = include_str!("../../assets/index.html");
pub const STYLE_CSS: &str = include_str!("../../assets/style.css");
pub const SCRIPT_JS: &str = include_str!("../../assets/script.js");

/// Exact-path lookup; anything unknown is the HTML shell, never a 404.
pub fn asset_for(path: &str) -> (&'static str, &'static str) {
    match path {
        "/style.css" => ("text/css", STYLE_CSS),
        "/script.js" => ("application/javascript", SCRIPT_JS),
        _ => ("text/html;charset=UTF-8", INDEX_HTML),
    }
}

// Router fallback: every path and method not claimed by the chat route.
pub async fn serve_asset(uri: Uri) -> Response {
    let (content_type, body) = asset_for(uri.path());
    ([(CONTENT_TYPE, content_type)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tentacles::test_support::{Behaviour, MockInference, router, send};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::json;

    async fn fetch(method: Method, path: &str) -> (StatusCode, String, Vec<u8>) {
        let app = router(MockInference::new(Behaviour::Reply(json!({}))), None);
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (res, bytes) = send(app, req).await;
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (res.status(), content_type, bytes)
    }

    #[tokio::test]
    async fn stylesheet_and_script() {
        let (status, ct, body) = fetch(Method::GET, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/css");
        assert_eq!(body, STYLE_CSS.as_bytes());

        let (status, ct, body) = fetch(Method::GET, "/script.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "application/javascript");
        assert_eq!(body, SCRIPT_JS.as_bytes());
    }

    #[tokio::test]
    async fn everything_else_is_the_html_shell() {
        for path in [
            "/",
            "/index.html",
            "/missing",
            "/a/b/c/d/e.png",
            "/style.css/extra",
            "/api/chat/",
            "/api",
            "/script.js?v=2&x=/style.css",
        ] {
            let (status, ct, body) = fetch(Method::GET, path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            if path.starts_with("/script.js") {
                assert_eq!(ct, "application/javascript", "{path}");
                continue;
            }
            assert_eq!(ct, "text/html;charset=UTF-8", "{path}");
            assert_eq!(body, INDEX_HTML.as_bytes(), "{path}");
        }
    }

    #[tokio::test]
    async fn fallback_ignores_method() {
        let (status, ct, _) = fetch(Method::POST, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/css");

        let (status, ct, _) = fetch(Method::DELETE, "/elsewhere").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/html;charset=UTF-8");
    }

    #[test]
    fn shell_references_the_other_assets() {
        assert!(INDEX_HTML.contains(r#"href="/style.css""#));
        assert!(INDEX_HTML.contains(r#"src="/script.js""#));
        assert!(INDEX_HTML.contains(r#"id="chat-model""#));
        assert!(SCRIPT_JS.contains("/api/chat"));
        assert!(SCRIPT_JS.contains("Error: failed to reach AI."));
    }
}

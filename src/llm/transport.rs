use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Pooled client that speaks both `https://` and plain `http://`.
pub fn build_client() -> HttpClient {
    let builder = match HttpsConnectorBuilder::new().with_native_roots() {
        Ok(builder) => builder,
        Err(e) => {
            warn!("native root certificates unavailable ({}), using bundled roots", e);
            HttpsConnectorBuilder::new().with_webpki_roots()
        }
    };
    let connector = builder.https_or_http().enable_http1().build();
    Client::builder(TokioExecutor::new()).build(connector)
}

/// POSTs `payload` as JSON and decodes the JSON reply. The status is returned
/// alongside the body so callers can decide what counts as failure.
pub async fn post_json(
    client: &HttpClient,
    endpoint: &Url,
    bearer: Option<&str>,
    payload: &Value,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(endpoint.as_str())
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = builder.body(Full::new(Bytes::from(payload.to_string())))?;
    debug!("upstream request {}", endpoint);
    let res: hyper::Response<Incoming> = client
        .request(req)
        .await
        .with_context(|| format!("request to {} failed", endpoint))?;
    let status = res.status();
    let body_bytes = res.into_body().collect().await?.to_bytes();
    let raw: Value = serde_json::from_slice(&body_bytes)
        .with_context(|| format!("upstream returned a non-JSON body (status {})", status))?;
    Ok((status, raw))
}

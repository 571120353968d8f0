//! `RequestMeta` extractor: the parts of a request kept for diagnostics.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, OriginalUri, Query};
use axum::http::header::HOST;
use axum::http::request::Parts;

use voxtrack_entity::session::RequestSnapshot;
use voxtrack_entity::session::request::MultiMap;

/// Method, URL, headers, host and peer address of the current request.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    pub url: String,
    pub headers: MultiMap,
    pub host: String,
    /// Query string pairs, in order.
    pub query: Vec<(String, String)>,
    /// Only known when the server was started with connection info.
    pub remote_addr: Option<String>,
}

impl RequestMeta {
    /// Combine with the submitted form into a session snapshot.
    ///
    /// Body values come first, then query values under the same names.
    pub fn into_snapshot(self, form: &[(String, String)]) -> RequestSnapshot {
        let query = self.query;
        RequestSnapshot {
            method: self.method,
            url: self.url,
            headers: self.headers,
            host: self.host,
            form: MultiMap::new(),
            remote_addr: self.remote_addr,
        }
        .with_form(form)
        .with_form(&query)
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let url = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.to_string())
            .unwrap_or_else(|| parts.uri.to_string());

        let query = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let mut headers = MultiMap::new();
        for (name, value) in &parts.headers {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string());

        Ok(Self {
            method: parts.method.to_string(),
            url,
            headers,
            host,
            query,
            remote_addr,
        })
    }
}

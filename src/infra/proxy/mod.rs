pub mod error;
pub mod routes;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Query, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::entities::resource::ResourceKind;
use crate::infra::http::client::METRICS_ROUTE;
use crate::infra::proxy::error::method_not_allowed;
use crate::infra::proxy::routes::{forward_resource, health, metrics, preflight};

pub const ALLOWED_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const ALLOWED_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    upstream_base: Arc<str>,
}

impl ProxyState {
    pub fn new(upstream_base: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream http client")?;

        Ok(Self {
            http,
            upstream_base: Arc::from(upstream_base.trim_end_matches('/')),
        })
    }

    fn upstream_url(&self, path: &str) -> String {
        format!("{}{path}", self.upstream_base)
    }
}

/// Adds the cross-origin headers to every response, errors included.
async fn cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

fn resource_route(kind: ResourceKind) -> MethodRouter<ProxyState> {
    get(
        move |State(state): State<ProxyState>, Query(params): Query<HashMap<String, String>>| async move {
            forward_resource(state, kind, params).await
        },
    )
    .options(preflight)
    .fallback(method_not_allowed)
}

pub fn router(state: ProxyState) -> Router {
    let mut router = Router::new();
    for kind in ResourceKind::ALL {
        router = router.route(kind.proxy_route(), resource_route(kind));
    }

    router
        .route(
            METRICS_ROUTE,
            get(metrics).options(preflight).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(middleware::from_fn(cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

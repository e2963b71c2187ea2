//! 迷你应用清单 (manifest) 路由。
//!
//! 清单是静态数据，只有图标、首页等 URL 取决于请求的来源 (origin)。

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ManifestConfig;
use crate::SharedState;

/// 宿主平台缓存清单的时长（秒）
pub const MANIFEST_MAX_AGE_SECS: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_association: Option<AccountAssociation>,
    pub miniapp: MiniApp,
    pub base_builder: BaseBuilder,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniApp {
    pub version: &'static str,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub home_url: String,
    pub splash_image_url: String,
    pub splash_background_color: &'static str,
    pub terms_url: String,
    pub support_url: String,
    pub categories: [&'static str; 2],
    pub primary_category: &'static str,
    pub tags: [&'static str; 3],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseBuilder {
    pub owner_address: String,
}

/// 组装清单。`with_association` 为真时带上账户关联（仅 farcaster 路由）
pub fn build_manifest(config: &ManifestConfig, origin: &str, with_association: bool) -> Manifest {
    let account_association = if with_association {
        config.account_association.clone()
    } else {
        None
    };
    Manifest {
        account_association,
        miniapp: MiniApp {
            version: "1",
            name: config.app_name.clone(),
            description: config.app_name.clone(),
            icon_url: format!("{origin}/icon.png"),
            home_url: origin.to_string(),
            splash_image_url: format!("{origin}/sphere.svg"),
            splash_background_color: "#0f172a",
            terms_url: origin.to_string(),
            support_url: origin.to_string(),
            categories: ["education", "games"],
            primary_category: "games",
            tags: ["batak", "game", "education"],
        },
        base_builder: BaseBuilder { owner_address: config.owner_address.clone() },
    }
}

/// 从请求头推断来源，优先使用反向代理提供的 `X-Forwarded-*`
pub fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    let first_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    match first_value("x-forwarded-host").or_else(|| first_value(header::HOST.as_str())) {
        Some(host) => {
            let proto = first_value("x-forwarded-proto").unwrap_or("http");
            format!("{proto}://{host}")
        }
        None => fallback.trim_end_matches('/').to_string(),
    }
}

// 返回具体的 Response，不借用 state 和 headers
fn manifest_response(state: &SharedState, headers: &HeaderMap, with_association: bool) -> Response {
    let origin = request_origin(headers, &state.config.public_origin);
    let manifest = build_manifest(&state.config.manifest, &origin, with_association);
    tracing::debug!(
        "返回清单, origin={}, association={}",
        origin,
        manifest.account_association.is_some()
    );
    (
        [(header::CACHE_CONTROL, format!("public, max-age={MANIFEST_MAX_AGE_SECS}"))],
        Json(manifest),
    )
        .into_response()
}

/// `GET /manifest.json`
pub async fn app_manifest(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    manifest_response(&state, &headers, false)
}

/// `GET /farcaster/manifest.json` 与 `GET /.well-known/farcaster.json`
pub async fn farcaster_manifest(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    manifest_response(&state, &headers, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::AppState;
    use axum::body::to_bytes;
    use axum::http::{HeaderValue, StatusCode};
    use std::sync::Arc;

    fn state() -> SharedState {
        Arc::new(AppState::new(ServerConfig::from_lookup(|_| None).unwrap()))
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn origin_prefers_forwarded_headers() {
        let h = headers(&[
            ("host", "internal:25917"),
            ("x-forwarded-host", "koz-maca.vercel.app, proxy"),
            ("x-forwarded-proto", "https"),
        ]);
        assert_eq!(request_origin(&h, "http://fallback"), "https://koz-maca.vercel.app");
    }

    #[test]
    fn origin_uses_host_then_fallback() {
        let h = headers(&[("host", "localhost:3000")]);
        assert_eq!(request_origin(&h, "http://fallback"), "http://localhost:3000");
        assert_eq!(request_origin(&HeaderMap::new(), "https://fallback/"), "https://fallback");
    }

    #[test]
    fn manifest_urls_derive_from_origin() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        let manifest = build_manifest(&config.manifest, "https://a.example", false);
        let value = serde_json::to_value(manifest).unwrap();

        assert!(value.get("accountAssociation").is_none());
        let app = &value["miniapp"];
        assert_eq!(app["version"], "1");
        assert_eq!(app["name"], "Koz Maca");
        assert_eq!(app["iconUrl"], "https://a.example/icon.png");
        assert_eq!(app["homeUrl"], "https://a.example");
        assert_eq!(app["splashImageUrl"], "https://a.example/sphere.svg");
        assert_eq!(app["splashBackgroundColor"], "#0f172a");
        assert_eq!(app["primaryCategory"], "games");
        assert_eq!(app["tags"], serde_json::json!(["batak", "game", "education"]));
        assert_eq!(
            value["baseBuilder"]["ownerAddress"],
            "0xACAFA638CB6736f54e9616F72DF895B0199b8Ba8"
        );
    }

    #[tokio::test]
    async fn farcaster_route_includes_association_and_cache_header() {
        let response = farcaster_manifest(State(state()), headers(&[("host", "koz.example")]))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["accountAssociation"]["payload"],
            "eyJkb21haW4iOiJrb3otbWFjYS52ZXJjZWwuYXBwIn0"
        );
        assert_eq!(value["miniapp"]["homeUrl"], "http://koz.example");
    }

    #[tokio::test]
    async fn plain_route_omits_association() {
        let response = app_manifest(State(state()), HeaderMap::new()).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value.get("accountAssociation").is_none());
        assert_eq!(value["miniapp"]["supportUrl"], "http://localhost:25917");
    }

    // 响应在 state 和 headers 被丢弃之后仍然可用
    fn response_from_locals(with_association: bool) -> Response {
        let state = state();
        let headers = headers(&[("x-forwarded-host", "koz.example")]);
        manifest_response(&state, &headers, with_association)
    }

    #[tokio::test]
    async fn response_outlives_request_data() {
        let response = response_from_locals(true);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["miniapp"]["iconUrl"], "http://koz.example/icon.png");
        assert!(value.get("accountAssociation").is_some());
    }
}

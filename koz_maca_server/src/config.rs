//! 从环境变量读取服务器配置。

use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

use crate::manifest::AccountAssociation;

const DEFAULT_BIND: &str = "0.0.0.0:25917";
const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:25917";
const DEFAULT_APP_NAME: &str = "Koz Maca";
const DEFAULT_OWNER_ADDRESS: &str = "0xACAFA638CB6736f54e9616F72DF895B0199b8Ba8";

const DEFAULT_ACCOUNT_HEADER: &str = "eyJmaWQiOjE0Mjg1MTQsInR5cGUiOiJjdXN0b2R5Iiwia2V5IjoiMHhjM2EwNzg1MDU1Q2VEMzRFYjI0MmJhYjQ3RGVGOTYyQmFjYzlENjkyIn0";
const DEFAULT_ACCOUNT_PAYLOAD: &str = "eyJkb21haW4iOiJrb3otbWFjYS52ZXJjZWwuYXBwIn0";
const DEFAULT_ACCOUNT_SIGNATURE: &str =
    "Nrhvm1yetqz5GC32uU9nRnbxivWpFIY20NJbp4sSS9IzNEqkpwI37dOcjc+5lIipjNYR1nK69Xja/yvPpOS+kxw=";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid KOZ_MACA_BIND address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// 请求里没有 Host 头时，用它拼接清单里的 URL
    pub public_origin: String,
    pub manifest: ManifestConfig,
}

/// 清单里固定不变的部分
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    pub app_name: String,
    pub owner_address: String,
    /// 任一字段为空时视为未配置
    pub account_association: Option<AccountAssociation>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 用任意查找函数构造配置，测试时不必改动进程环境变量
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind = get("KOZ_MACA_BIND", DEFAULT_BIND);
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr { value: bind.clone(), source })?;

        let header = get("KOZ_MACA_ACCOUNT_HEADER", DEFAULT_ACCOUNT_HEADER);
        let payload = get("KOZ_MACA_ACCOUNT_PAYLOAD", DEFAULT_ACCOUNT_PAYLOAD);
        let signature = get("KOZ_MACA_ACCOUNT_SIGNATURE", DEFAULT_ACCOUNT_SIGNATURE);
        let configured = !header.is_empty() && !payload.is_empty() && !signature.is_empty();
        let account_association =
            configured.then(|| AccountAssociation { header, payload, signature });

        Ok(ServerConfig {
            bind_addr,
            public_origin: get("KOZ_MACA_PUBLIC_ORIGIN", DEFAULT_PUBLIC_ORIGIN)
                .trim_end_matches('/')
                .to_string(),
            manifest: ManifestConfig {
                app_name: get("KOZ_MACA_APP_NAME", DEFAULT_APP_NAME),
                owner_address: get("KOZ_MACA_OWNER_ADDRESS", DEFAULT_OWNER_ADDRESS),
                account_association,
            },
        })
    }
}

use thiserror::Error;

use crate::config::ConfigError;

/// 服务器启动阶段的错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

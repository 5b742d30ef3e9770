//! 错误类型定义
//!
//! 这个模块定义了库中使用的所有错误类型，使用 thiserror 提供丰富的错误信息。
//!
//! 注意：状态机内部的不变量被破坏（例如事件从未见过任何头部行就被结束）
//! 属于程序缺陷，直接 panic，不会以 `SlowlogError` 的形式返回。

/// 慢日志解析器的结果类型
pub type Result<T> = std::result::Result<T, SlowlogError>;

/// 慢日志解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum SlowlogError {
    /// IO错误（EOF 以外的读取失败，解析会立即中止）
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 配置文件反序列化错误
    #[error("配置解析错误: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// 配置文件序列化错误
    #[error("配置序列化错误: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON 序列化错误
    #[cfg(feature = "exporter-json")]
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 日志错误（仅在启用 logging feature 时可用）
    #[cfg(feature = "logging")]
    #[error("日志错误: {0}")]
    Log(#[from] crate::logging::LogError),

    /// 其他错误
    #[error("未知错误: {0}")]
    Other(String),
}

impl SlowlogError {
    /// 创建一个配置错误
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        #[cfg(feature = "logging")]
        tracing::error!("配置错误: {}", message);
        Self::Config(message)
    }

    /// 创建一个其他类型错误
    pub fn other<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        #[cfg(feature = "logging")]
        tracing::error!("未知错误: {}", message);
        Self::Other(message)
    }

    /// 检查是否为 IO 错误
    pub fn is_io_error(&self) -> bool {
        matches!(self, SlowlogError::Io(_))
    }

    /// 检查是否为配置错误（含配置文件的序列化/反序列化错误）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SlowlogError::Config(_)
                | SlowlogError::TomlDe(_)
                | SlowlogError::TomlSer(_)
        )
    }

    /// 检查是否为其他错误
    pub fn is_other_error(&self) -> bool {
        matches!(self, SlowlogError::Other(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_err = SlowlogError::config_error("config missing");
        assert!(config_err.is_config_error());
        assert!(!config_err.is_io_error());

        let other_err = SlowlogError::other("boom");
        assert!(other_err.is_other_error());
    }

    #[test]
    fn test_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SlowlogError = io_err.into();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_toml_error_is_config_error() {
        let toml_err = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let err: SlowlogError = toml_err.into();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = SlowlogError::Config("bad level".to_string());
        let display = format!("{}", err);
        assert!(display.contains("bad level"));
    }
}

//! 日志初始化和配置模块
//!
//! 这个模块提供了统一的日志初始化功能，使用 tracing 库。
//! 解析器本身只产生 tracing 事件，是否输出、输出到哪里由调用方在这里决定。

use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志文件名前缀
pub const LOG_FILE_PREFIX: &str = "slowlog";

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 是否输出到控制台
    pub enable_stdout: bool,
    /// 日志文件目录，`None` 表示不写文件
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认级别
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 设置是否输出到控制台
    pub fn stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }

    /// 设置日志文件目录
    pub fn log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: Level::INFO, enable_stdout: true, log_dir: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 将字符串形式的级别转换为 `Level`
pub fn parse_level(level: &str) -> LogResult<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(LogError::Config(format!("无效的日志级别: {other}"))),
    }
}

/// 初始化日志系统
///
/// - `RUST_LOG` 存在时优先使用，否则使用配置的级别
/// - 控制台输出可关闭
/// - 配置了 `log_dir` 时按天滚动写入 `slowlog.*` 文件
///
/// 重复初始化不视为错误。
///
/// # Examples
///
/// ```no_run
/// use slowlog_parser::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// let config = LogConfig::new().level(Level::DEBUG).log_dir("logs");
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> LogResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let console_layer = config.enable_stdout.then(|| {
        fmt::layer()
            .with_timer(SystemTime)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_ansi(true)
    });

    let mut guard = None;
    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender =
                tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
            guard = Some(g);
            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_timer(SystemTime)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let subscriber = Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    if subscriber.try_init().is_ok() {
        // appender 的 guard 需要与进程同寿命
        if let Some(g) = guard {
            std::mem::forget(g);
        }
        tracing::info!("日志系统初始化完成，级别: {}", config.level);
    }
    Ok(())
}

/// 使用默认配置初始化日志系统（INFO 级别，仅控制台）
pub fn init_default_logging() -> LogResult<()> {
    init_logging(LogConfig::default())
}

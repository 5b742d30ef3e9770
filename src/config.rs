//! 配置管理模块
//!
//! 提供统一的配置文件读取和管理功能。配置文件为 TOML 格式：
//!
//! ```toml
//! [log]
//! enable_stdout = true
//! log_dir = "logs"
//! level = "info"
//!
//! [parser]
//! start_offset = 0
//! filter_admin_commands = ["Quit", "Ping"]
//! event_buffer = 0
//! ```

use crate::error::{Result, SlowlogError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 允许的日志级别
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 主配置结构体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub log: LogSection,
    /// 慢日志解析配置
    #[serde(default)]
    pub parser: ParserConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// 是否启用控制台输出
    pub enable_stdout: bool,
    /// 日志输出目录，空字符串表示不写文件
    pub log_dir: String,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            log_dir: String::new(),
            level: "info".to_string(),
        }
    }
}

impl LogSection {
    /// 转换为 `logging::LogConfig`
    #[cfg(feature = "logging")]
    pub fn to_log_config(&self) -> Result<crate::logging::LogConfig> {
        let level = crate::logging::parse_level(&self.level)?;
        let mut config =
            crate::logging::LogConfig::new().level(level).stdout(self.enable_stdout);
        if !self.log_dir.is_empty() {
            config = config.log_dir(&self.log_dir);
        }
        Ok(config)
    }
}

/// 解析器配置（构造时传入）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 续读起点（字节偏移），非 0 时在首次读取前 seek
    pub start_offset: u64,
    /// 需要丢弃的管理命令（如 `Quit`），不输出对应事件
    pub filter_admin_commands: HashSet<String>,
    /// 输出通道容量，0 表示同步交接（生产者等待消费者取走）
    pub event_buffer: usize,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置续读起点
    pub fn with_start_offset(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self
    }

    /// 添加一个需要过滤的管理命令
    pub fn filter_admin_command<S: Into<String>>(mut self, command: S) -> Self {
        self.filter_admin_commands.insert(command.into());
        self
    }

    /// 设置输出通道容量
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// 判断管理命令是否被过滤
    pub fn is_filtered(&self, command: &str) -> bool {
        self.filter_admin_commands.contains(command)
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// 从字符串加载配置
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(SlowlogError::config_error(format!(
                "无效的日志级别: {}",
                self.log.level
            )));
        }

        if self.parser.filter_admin_commands.iter().any(|c| c.is_empty()) {
            return Err(SlowlogError::config_error("过滤的管理命令不能为空字符串"));
        }

        Ok(())
    }
}

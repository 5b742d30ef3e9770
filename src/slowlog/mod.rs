//! MySQL 慢查询日志解析模块
//!
//! 提供行读取与偏移跟踪、头部与正文解析、事件输出以及取消控制

pub mod metrics;
pub mod parser;
pub mod patterns;
pub mod reader;
pub mod stop;
pub mod types;

#[cfg(feature = "async")]
pub mod async_parser;

// 重新导出核心类型和函数
pub use parser::{Mode, SlowLogParser, collect_events};
pub use reader::{Line, LineReader};
pub use stop::StopHandle;
pub use types::{Event, QUERY_TIME};

#[cfg(feature = "async")]
pub use async_parser::AsyncSlowLogParser;

//! # slowlog-parser
//!
//! MySQL 慢查询日志（slow query log）流式解析库。
//!
//! - 按行驱动的状态机，逐条输出 [`Event`]
//! - 精确记录每个事件首行的字节偏移，可从任意偏移续读
//! - 有界通道交付事件，消费者慢时生产者自动等待
//! - [`StopHandle`] 协作式取消，阻塞发送时同样可以被打断
//!
//! ```
//! use slowlog_parser::{ParserConfig, collect_events};
//! use std::io::Cursor;
//!
//! let log = concat!(
//!     "# Time: 071015 21:43:52\n",
//!     "# User@Host: root[root] @ localhost []\n",
//!     "# Query_time: 2.000001  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 1\n",
//!     "SELECT 1;\n",
//! );
//! let events = collect_events(Cursor::new(log), ParserConfig::new()).unwrap();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].query, "SELECT 1");
//! assert_eq!(events[0].number_metrics["Rows_sent"], 1);
//! ```

pub mod config;
pub mod error;
pub mod slowlog;

#[cfg(feature = "logging")]
pub mod logging;

pub mod exporter;

pub use config::{Config, ParserConfig};
pub use error::{Result, SlowlogError};
pub use slowlog::{Event, SlowLogParser, StopHandle, collect_events};

//! 慢日志流式解析器
//!
//! 逐行驱动的状态机，一次只维护一个进行中的事件：
//!
//! ```text
//!            头部行                   非头部行
//!   Idle ──────────────▶ Header ──────────────▶ Query
//!     ▲                    ▲                      │
//!     │                    └──── 头部行（先输出）──┤
//!     └──────── 管理命令（输出或过滤）─────────────┘
//! ```
//!
//! ## 输入示例
//!
//! ```text
//! # Time: 071015 21:43:52
//! # User@Host: root[root] @ localhost []
//! # Query_time: 2.000001  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 1
//! use shop;
//! SET timestamp=1192459432;
//! SELECT 1;
//! # administrator command: Quit;
//! ```
//!
//! 事件通过有界通道交给消费者，发送会阻塞直到被取走或收到停止信号。
//!
//! ## 使用示例
//!
//! ```no_run
//! use slowlog_parser::{ParserConfig, SlowLogParser};
//! use std::thread;
//!
//! let config = ParserConfig::new().filter_admin_command("Quit");
//! let parser = SlowLogParser::from_path("slow.log", config)?;
//! let events = parser.events();
//! let stopper = parser.stop_handle();
//!
//! let worker = thread::spawn(move || parser.start());
//! for event in events.iter() {
//!     println!("{} {:?}", event.offset, event.query_time());
//!     if event.admin {
//!         stopper.stop();
//!     }
//! }
//! worker.join().unwrap()?;
//! # Ok::<(), slowlog_parser::SlowlogError>(())
//! ```

use crate::config::ParserConfig;
use crate::error::Result;
use crate::slowlog::metrics::parse_metrics_line;
use crate::slowlog::patterns::{
    ADMIN_PREFIX, TIME_PREFIX, USE_PREFIX, USER_PREFIX, capture_admin_command,
    capture_time, capture_user_host, is_header, is_session_set,
};
use crate::slowlog::reader::{Line, LineReader};
use crate::slowlog::stop::StopHandle;
use crate::slowlog::types::{Event, QUERY_TIME};
use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::thread;

/// 当前解析阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 等待下一个头部块
    #[default]
    Idle,
    /// 正在读取头部行
    Header,
    /// 正在读取查询正文
    Query,
}

/// 进行中事件及其计数
#[derive(Debug, Default)]
struct ParseState {
    mode: Mode,
    event: Event,
    header_lines: u64,
    query_lines: u64,
}

impl ParseState {
    /// 换一个空事件并清零计数，同时切换到 `next`
    fn reset(&mut self, next: Mode) -> Event {
        self.header_lines = 0;
        self.query_lines = 0;
        self.mode = next;
        std::mem::take(&mut self.event)
    }
}

/// 慢日志解析器
pub struct SlowLogParser<R> {
    reader: LineReader<R>,
    config: ParserConfig,
    state: ParseState,
    line_offset: u64,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
    stop: StopHandle,
    stopped: bool,
}

impl SlowLogParser<File> {
    /// 打开日志文件并创建解析器
    pub fn from_path<P: AsRef<Path>>(path: P, config: ParserConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        #[cfg(feature = "logging")]
        tracing::debug!("打开慢日志文件: {}", path.as_ref().display());
        Ok(Self::new(file, config))
    }
}

impl<R: Read> SlowLogParser<R> {
    pub fn new(reader: R, config: ParserConfig) -> Self {
        let (event_tx, event_rx) = bounded(config.event_buffer);
        Self {
            reader: LineReader::new(reader, config.start_offset),
            config,
            state: ParseState::default(),
            line_offset: 0,
            event_tx,
            event_rx,
            stop: StopHandle::new(),
            stopped: false,
        }
    }

    /// 输出事件的接收端；`start` 返回后通道关闭
    pub fn events(&self) -> Receiver<Event> {
        self.event_rx.clone()
    }

    /// 取消句柄，可在其它线程调用 `stop()`
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 发出停止信号
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// 处理一行，按当前阶段分派
    fn process_line(&mut self, line: &Line) {
        self.line_offset = line.offset;
        #[cfg(feature = "logging")]
        tracing::trace!("+{} line: {}", line.offset, line.text);

        match self.state.mode {
            Mode::Header => self.parse_header(&line.text),
            Mode::Query => self.parse_query(&line.text),
            Mode::Idle => {
                if is_header(&line.text) {
                    self.state.mode = Mode::Header;
                    self.parse_header(&line.text);
                }
            }
        }
    }

    fn parse_header(&mut self, line: &str) {
        if !is_header(line) {
            self.state.mode = Mode::Query;
            self.parse_query(line);
            return;
        }

        if self.state.header_lines == 0 {
            self.state.event.offset = self.line_offset;
        }
        self.state.header_lines += 1;

        if line.starts_with(TIME_PREFIX) {
            match capture_time(line) {
                Some(ts) => self.state.event.ts = ts.to_string(),
                None => {
                    #[cfg(feature = "logging")]
                    tracing::warn!("+{} 时间行无法识别: {}", self.line_offset, line);
                }
            }
            // 旧格式会把用户信息写在时间行里
            if let Some((user, host)) = capture_user_host(line) {
                #[cfg(feature = "logging")]
                tracing::trace!("user (bad format)");
                self.state.event.user = user.to_string();
                self.state.event.host = host.to_string();
            }
        } else if line.starts_with(USER_PREFIX) {
            match capture_user_host(line) {
                Some((user, host)) => {
                    self.state.event.user = user.to_string();
                    self.state.event.host = host.to_string();
                }
                None => {
                    #[cfg(feature = "logging")]
                    tracing::warn!("+{} 用户行无法识别: {}", self.line_offset, line);
                }
            }
        } else if line.starts_with(ADMIN_PREFIX) {
            self.parse_admin(line);
        } else {
            parse_metrics_line(line, &mut self.state.event);
        }
    }

    fn parse_query(&mut self, line: &str) {
        if line.starts_with(ADMIN_PREFIX) {
            self.parse_admin(line);
            return;
        }

        if is_header(line) {
            #[cfg(feature = "logging")]
            tracing::trace!("next event");
            self.send_event(Mode::Header);
            self.parse_header(line);
            return;
        }

        if self.state.query_lines == 0 && line.starts_with(USE_PREFIX) {
            let db = line[USE_PREFIX.len()..].trim_end_matches(';');
            #[cfg(feature = "logging")]
            tracing::trace!("use db: {}", db);
            self.state.event.db = db.to_string();
        } else if is_session_set(line) {
            #[cfg(feature = "logging")]
            tracing::trace!("set var");
        } else {
            let query = &mut self.state.event.query;
            if self.state.query_lines > 0 {
                query.push('\n');
                query.push_str(line);
            } else {
                *query = line.to_string();
            }
            self.state.query_lines += 1;
        }
    }

    /// 管理命令总是事件的最后一行
    fn parse_admin(&mut self, line: &str) {
        let command = capture_admin_command(line).unwrap_or_default();
        #[cfg(feature = "logging")]
        tracing::trace!("admin command: {}", command);
        self.state.event.admin = true;
        self.state.event.query = command.to_string();

        if self.config.is_filtered(command) {
            #[cfg(feature = "logging")]
            tracing::debug!("+{} 管理命令 {} 已过滤", self.line_offset, command);
            self.state.reset(Mode::Idle);
        } else {
            self.send_event(Mode::Idle);
        }
    }

    /// 校验并输出当前事件，然后换新事件并切换到 `next`
    fn send_event(&mut self, next: Mode) {
        let header_lines = self.state.header_lines;
        let mut event = self.state.reset(next);

        if !event.is_complete() {
            if header_lines == 0 {
                panic!(
                    "事件缺少 {QUERY_TIME} 且没有任何头部行，偏移 {}: {:?}",
                    self.line_offset, event
                );
            }
            // 从 Query_time 之后的头部行开始解析，例如续读时截断的事件
            #[cfg(feature = "logging")]
            tracing::debug!("丢弃缺少 {} 的事件，偏移 {}", QUERY_TIME, event.offset);
            return;
        }

        if let Some(db) = event.db.strip_suffix('\n') {
            event.db = db.to_string();
        }
        if let Some(db) = event.db.strip_suffix(';') {
            event.db = db.to_string();
        }
        if let Some(query) = event.query.strip_suffix(';') {
            event.query = query.to_string();
        }

        let tx = &self.event_tx;
        let signal = self.stop.signal();
        let interrupted = select! {
            send(tx, event) -> res => res.is_err(),
            recv(signal) -> _ => true,
        };
        if interrupted {
            #[cfg(feature = "logging")]
            tracing::debug!("发送事件时停止");
            self.stopped = true;
        }
    }
}

impl<R: Read + Seek> SlowLogParser<R> {
    /// 运行解析循环，直到输入结束或收到停止信号。
    ///
    /// 只有 EOF 以外的 I/O 错误会返回 `Err`。停止时不会输出未完成的事件。
    pub fn start(mut self) -> Result<()> {
        #[cfg(feature = "logging")]
        tracing::debug!("开始解析，start_offset = {}", self.config.start_offset);

        self.reader.seek_to_start()?;

        while !self.stopped {
            if self.stop.is_stopped() {
                self.stopped = true;
                break;
            }

            let Some(line) = self.reader.next_line()? else {
                break;
            };
            self.process_line(&line);
        }

        if !self.stopped && self.state.query_lines > 0 {
            self.send_event(Mode::Idle);
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            "解析结束，已读取 {} 行，当前字节位置 {}，stopped = {}",
            self.reader.lines_read(),
            self.reader.bytes_read(),
            self.stopped
        );
        Ok(())
    }
}

/// 在后台线程运行解析器并收集全部事件
pub fn collect_events<R>(reader: R, config: ParserConfig) -> Result<Vec<Event>>
where
    R: Read + Seek + Send,
{
    let parser = SlowLogParser::new(reader, config);
    let events = parser.events();

    thread::scope(|s| {
        let worker = s.spawn(move || parser.start());
        let collected: Vec<Event> = events.iter().collect();
        match worker.join() {
            Ok(result) => result.map(|()| collected),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

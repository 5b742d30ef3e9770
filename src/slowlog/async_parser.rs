//! 基于 tokio 的慢日志解析适配
//!
//! 解析本身仍是阻塞的，放在 `spawn_blocking` 中运行，事件转发到 tokio 的有界通道。

use crate::config::ParserConfig;
use crate::error::Result;
use crate::slowlog::parser::SlowLogParser;
use crate::slowlog::stop::StopHandle;
use crate::slowlog::types::Event;
use std::path::Path;
use std::thread;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 异步慢日志解析器
pub struct AsyncSlowLogParser;

impl AsyncSlowLogParser {
    /// 在阻塞线程池中解析文件，事件通过 `buffer` 大小的通道交付
    ///
    /// # 返回
    /// - 事件接收器；丢弃它会让解析器停止
    /// - 取消句柄
    /// - 解析任务句柄，结果与 [`SlowLogParser::start`] 相同
    ///
    /// 必须在 tokio 运行时中调用。
    pub async fn parse_file<P>(
        path: P,
        config: ParserConfig,
        buffer: usize,
    ) -> Result<(mpsc::Receiver<Event>, StopHandle, JoinHandle<Result<()>>)>
    where
        P: AsRef<Path>,
    {
        let parser = SlowLogParser::from_path(path.as_ref(), config)?;
        let events = parser.events();
        let stop = parser.stop_handle();
        let (tx, rx) = mpsc::channel(buffer.max(1));

        #[cfg(feature = "logging")]
        tracing::debug!(
            "开始异步解析文件: {}, buffer = {}",
            path.as_ref().display(),
            buffer
        );

        let forward_stop = stop.clone();
        let handle = tokio::task::spawn_blocking(move || {
            thread::scope(|s| {
                let worker = s.spawn(move || parser.start());

                for event in events.iter() {
                    if tx.blocking_send(event).is_err() {
                        #[cfg(feature = "logging")]
                        tracing::warn!("事件接收器已关闭，停止解析");
                        forward_stop.stop();
                        break;
                    }
                }

                match worker.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            })
        });

        Ok((rx, stop, handle))
    }
}

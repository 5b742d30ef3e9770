//! JSON Lines 导出器（同步版本）
//!
//! 每个事件写成一行 JSON 对象，便于追加写入和流式读取。

use super::{ExportStats, SyncExporter};
use crate::error::Result;
use crate::slowlog::types::Event;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 同步 JSON Lines 导出器
pub struct SyncJsonExporter {
    writer: BufWriter<File>,
    stats: ExportStats,
}

impl SyncJsonExporter {
    /// 创建导出器，目标文件已存在时会被截断
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        #[cfg(feature = "logging")]
        tracing::debug!("创建 JSON 导出文件: {}", path.as_ref().display());
        Ok(Self { writer: BufWriter::new(file), stats: ExportStats::new() })
    }

    fn write_event(&mut self, event: &Event) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl SyncExporter for SyncJsonExporter {
    fn name(&self) -> &str {
        "JSON"
    }

    fn export_record(&mut self, event: &Event) -> Result<()> {
        match self.write_event(event) {
            Ok(()) => {
                self.stats.exported_records += 1;
                Ok(())
            }
            Err(e) => {
                self.stats.failed_records += 1;
                Err(e)
            }
        }
    }

    fn export_batch(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            self.export_record(event)?;
        }
        #[cfg(feature = "logging")]
        tracing::debug!("JSON批量导出: {} 条记录", events.len());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.stats.finish();

        #[cfg(feature = "logging")]
        tracing::info!("JSON导出完成: {} 条记录", self.stats.exported_records);

        Ok(())
    }

    fn get_stats(&self) -> ExportStats {
        self.stats.clone()
    }
}

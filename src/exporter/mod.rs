//! 事件导出模块
//!
//! 提供统一的导出接口，以及把解析器输出通道接到导出器上的辅助函数

pub mod stats;
pub use stats::ExportStats;

#[cfg(feature = "exporter-json")]
pub mod json;
#[cfg(feature = "exporter-json")]
pub use json::SyncJsonExporter;

use crate::error::Result;
use crate::slowlog::types::Event;
use crossbeam_channel::Receiver;

/// 同步事件导出器的统一接口
pub trait SyncExporter: Send {
    /// 导出器名称
    fn name(&self) -> &str;

    /// 导出单个事件
    fn export_record(&mut self, event: &Event) -> Result<()>;

    /// 批量导出事件
    fn export_batch(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            self.export_record(event)?;
        }
        Ok(())
    }

    /// 完成导出，清理资源
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }

    /// 获取导出统计信息
    fn get_stats(&self) -> ExportStats {
        ExportStats::default()
    }
}

/// 持续从解析器通道取事件并导出，直到通道关闭。
///
/// 导出失败会立即返回，调用方通常应随后对解析器调用 `stop()`。
pub fn drain_to_exporter<E>(events: &Receiver<Event>, exporter: &mut E) -> Result<ExportStats>
where
    E: SyncExporter + ?Sized,
{
    #[cfg(feature = "logging")]
    tracing::debug!("开始导出事件到 {}", exporter.name());

    for event in events.iter() {
        exporter.export_record(&event)?;
    }
    exporter.finalize()?;

    let stats = exporter.get_stats();
    #[cfg(feature = "logging")]
    tracing::info!("{} 导出完成: {}", exporter.name(), stats);
    Ok(stats)
}

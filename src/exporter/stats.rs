//! 导出统计信息模块

use std::time::{Duration, Instant};

/// 导出统计信息
#[derive(Debug, Default, Clone)]
pub struct ExportStats {
    /// 已导出的事件数
    pub exported_records: usize,
    /// 导出失败的事件数
    pub failed_records: usize,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
}

impl ExportStats {
    /// 创建新的统计信息，记录开始时间
    pub fn new() -> Self {
        Self { start_time: Some(Instant::now()), ..Default::default() }
    }

    /// 标记导出完成
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// 从 `new` 到 `finish` 的耗时，任一端缺失时为 `None`
    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_time?.duration_since(self.start_time?))
    }

    /// 每秒导出事件数
    pub fn events_per_second(&self) -> Option<f64> {
        let secs = self.duration()?.as_secs_f64();
        Some(if secs > 0.0 { self.exported_records as f64 / secs } else { 0.0 })
    }
}

impl std::fmt::Display for ExportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 条事件", self.exported_records)?;
        if self.failed_records > 0 {
            write!(f, "（失败 {}）", self.failed_records)?;
        }
        if let (Some(d), Some(eps)) = (self.duration(), self.events_per_second()) {
            write!(f, "，耗时 {:.2}s，{:.0} 条/秒", d.as_secs_f64(), eps)?;
        }
        Ok(())
    }
}

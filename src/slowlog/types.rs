use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;

/// 查询耗时指标名，事件只有带上它才会被输出
pub const QUERY_TIME: &str = "Query_time";

/// 单条慢日志事件（一次查询执行或一条管理命令）
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// 事件首个头部行在源中的字节偏移
    pub offset: u64,
    /// 头部中的原始时间戳文本，序列化为 `timestamp`
    #[serde(rename = "timestamp")]
    pub ts: String,
    /// 连接用户
    pub user: String,
    /// 连接主机
    pub host: String,
    /// 当前库名（来自 `Schema` 指标或 `use` 语句）
    pub db: String,
    /// 是否为管理命令
    pub admin: bool,
    /// SQL 文本（管理命令时为命令名）
    pub query: String,
    /// `*_time` / `*_wait` 指标，单位秒
    pub time_metrics: HashMap<String, f64>,
    /// 其余数值指标
    pub number_metrics: HashMap<String, u64>,
    /// 取值为 Yes/No 的指标
    pub bool_metrics: HashMap<String, bool>,
    /// `Log_slow_rate_type`
    pub rate_type: String,
    /// `Log_slow_rate_limit`
    pub rate_limit: u8,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否带有 `Query_time`，即能否被输出
    pub fn is_complete(&self) -> bool {
        self.time_metrics.contains_key(QUERY_TIME)
    }

    /// 查询耗时（秒）
    pub fn query_time(&self) -> Option<f64> {
        self.time_metrics.get(QUERY_TIME).copied()
    }

    /// 将原始时间戳解析为 `NaiveDateTime`。
    ///
    /// 支持两种写法：
    /// - 旧格式 `071015 21:43:52`（日期与时间之间一到两个空格，小时可不补零）
    /// - RFC 3339，例如 `2019-01-01T12:00:00.123456Z`，按 UTC 取本地时间
    ///
    /// 其它格式返回 `None`，`ts` 字段本身不受影响。
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let ts = self.ts.trim();
        if ts.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
            return Some(dt.naive_utc());
        }

        let normalized = ts.split_whitespace().collect::<Vec<_>>().join(" ");
        NaiveDateTime::parse_from_str(&normalized, "%y%m%d %H:%M:%S").ok()
    }
}

//! 头部指标行的字段提取与分类
//!
//! 一行里可能有多个 `name: value` 对，例如：
//!
//! ```text
//! # Query_time: 2.000001  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 1
//! # Schema: shop  Last_errno: 0  Killed: 0
//! # QC_Hit: No  Full_scan: Yes  Full_join: No
//! # Log_slow_rate_type: query  Log_slow_rate_limit: 10
//! ```
//!
//! 数值解析是宽松的：解析失败按 0 处理，不会让整行失败。

use crate::slowlog::patterns::METRICS_RE;
use crate::slowlog::types::Event;

/// 库名字段
pub const SCHEMA: &str = "Schema";
/// 采样类型字段
pub const RATE_TYPE: &str = "Log_slow_rate_type";
/// 采样比例字段
pub const RATE_LIMIT: &str = "Log_slow_rate_limit";

/// 单个指标对的分类结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric<'a> {
    /// `*_time` / `*_wait`
    Time(f64),
    /// 值为 `Yes` / `No`
    Bool(bool),
    /// `Schema`
    Schema(&'a str),
    /// `Log_slow_rate_type`
    RateType(&'a str),
    /// `Log_slow_rate_limit`
    RateLimit(u8),
    /// 其余按无符号整数处理
    Number(u64),
}

/// 判断指标名是否表示耗时
#[must_use]
pub fn is_duration_name(name: &str) -> bool {
    name.ends_with("_time") || name.ends_with("_wait")
}

/// 按规则顺序对一个指标对分类
pub fn classify<'a>(name: &str, value: &'a str) -> Metric<'a> {
    if is_duration_name(name) {
        Metric::Time(value.parse::<f64>().unwrap_or(0.0))
    } else if value == "Yes" || value == "No" {
        Metric::Bool(value == "Yes")
    } else if name == SCHEMA {
        Metric::Schema(value)
    } else if name == RATE_TYPE {
        Metric::RateType(value)
    } else if name == RATE_LIMIT {
        // 超过 255 时按低 8 位截断
        Metric::RateLimit(value.parse::<u64>().unwrap_or(0) as u8)
    } else {
        Metric::Number(value.parse::<u64>().unwrap_or(0))
    }
}

/// 把一个指标写入事件
pub fn apply(event: &mut Event, name: &str, metric: Metric<'_>) {
    match metric {
        Metric::Time(v) => {
            event.time_metrics.insert(name.to_string(), v);
        }
        Metric::Bool(v) => {
            event.bool_metrics.insert(name.to_string(), v);
        }
        Metric::Schema(db) => event.db = db.to_string(),
        Metric::RateType(t) => event.rate_type = t.to_string(),
        Metric::RateLimit(v) => event.rate_limit = v,
        Metric::Number(v) => {
            event.number_metrics.insert(name.to_string(), v);
        }
    }
}

/// 解析一整行指标并写入事件，返回识别到的指标对数量
pub fn parse_metrics_line(line: &str, event: &mut Event) -> usize {
    let mut count = 0;
    for caps in METRICS_RE.captures_iter(line) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str();
        apply(event, name, classify(name, value.as_str()));
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify("Query_time", "2.5"), Metric::Time(2.5));
        assert_eq!(classify("InnoDB_queue_wait", "0.1"), Metric::Time(0.1));
        assert_eq!(classify("QC_Hit", "No"), Metric::Bool(false));
        assert_eq!(classify("Full_scan", "Yes"), Metric::Bool(true));
        assert_eq!(classify("Schema", "shop"), Metric::Schema("shop"));
        assert_eq!(classify("Log_slow_rate_type", "query"), Metric::RateType("query"));
        assert_eq!(classify("Log_slow_rate_limit", "10"), Metric::RateLimit(10));
        assert_eq!(classify("Rows_sent", "42"), Metric::Number(42));
    }

    #[test]
    fn test_duration_suffix_wins_over_bool() {
        // 名字以 _time 结尾时，即使值是 Yes 也按耗时处理
        assert_eq!(classify("Odd_time", "Yes"), Metric::Time(0.0));
    }

    #[test]
    fn test_unparseable_numbers_default_to_zero() {
        assert_eq!(classify("Query_time", "abc"), Metric::Time(0.0));
        assert_eq!(classify("Rows_sent", "1.5"), Metric::Number(0));
        assert_eq!(classify("Rows_sent", "-3"), Metric::Number(0));
        assert_eq!(classify("Log_slow_rate_limit", "x"), Metric::RateLimit(0));
    }

    #[test]
    fn test_rate_limit_truncates() {
        assert_eq!(classify("Log_slow_rate_limit", "300"), Metric::RateLimit(44));
    }

    #[test]
    fn test_parse_metrics_line() {
        let mut event = Event::new();
        let n = parse_metrics_line(
            "# Query_time: 2.000001  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 1",
            &mut event,
        );
        assert_eq!(n, 4);
        assert!((event.time_metrics["Query_time"] - 2.000001).abs() < 1e-9);
        assert_eq!(event.time_metrics["Lock_time"], 0.0);
        assert_eq!(event.number_metrics["Rows_sent"], 1);
        assert_eq!(event.number_metrics["Rows_examined"], 1);
    }

    #[test]
    fn test_parse_metrics_line_mixed() {
        let mut event = Event::new();
        parse_metrics_line("# Schema: shop  Last_errno: 0  Killed: 0", &mut event);
        parse_metrics_line("# QC_Hit: No  Full_scan: Yes", &mut event);
        parse_metrics_line("# Log_slow_rate_type: query  Log_slow_rate_limit: 10", &mut event);
        assert_eq!(event.db, "shop");
        assert_eq!(event.number_metrics["Last_errno"], 0);
        assert!(!event.bool_metrics["QC_Hit"]);
        assert!(event.bool_metrics["Full_scan"]);
        assert_eq!(event.rate_type, "query");
        assert_eq!(event.rate_limit, 10);
    }

    #[test]
    fn test_value_at_end_of_line_may_be_empty() {
        let mut event = Event::new();
        parse_metrics_line("# Thread_id: 7  Schema: ", &mut event);
        assert_eq!(event.number_metrics["Thread_id"], 7);
    }
}

//! 慢日志各类行的匹配规则
//!
//! 正则统一在这里预编译，解析阶段只做查找。

use lazy_static::lazy_static;
use regex::Regex;

/// 管理命令行前缀
pub const ADMIN_PREFIX: &str = "# admin";
/// 时间行前缀
pub const TIME_PREFIX: &str = "# Time";
/// 用户行前缀
pub const USER_PREFIX: &str = "# User";
/// 切换库语句前缀
pub const USE_PREFIX: &str = "use ";

lazy_static! {
    /// 头部行：`#` + 空白 + 大写字母
    pub static ref HEADER_RE: Regex = Regex::new(r"^#\s+[A-Z]").unwrap();
    /// 时间（旧格式，日期与时间两段）
    pub static ref TIME_RE: Regex = Regex::new(r"Time: (\S+\s{1,2}\S+)").unwrap();
    /// 时间（单段，如 RFC 3339）
    pub static ref TIME_TOKEN_RE: Regex = Regex::new(r"Time: (\S+)").unwrap();
    /// 用户与主机；主机可能是裸主机名，也可能只出现在方括号中
    pub static ref USER_RE: Regex =
        Regex::new(r"User@Host: ([^\[]+|\[[^\[]+\]).*?@ (\S*) \[(.*)\]").unwrap();
    /// `name: value` 指标对
    pub static ref METRICS_RE: Regex = Regex::new(r"(\w+): (\S+|\z)").unwrap();
    /// 管理命令
    pub static ref ADMIN_RE: Regex = Regex::new(r"command: (.+)").unwrap();
    /// 会话变量记账语句
    pub static ref SET_RE: Regex =
        Regex::new(r"SET (?:last_insert_id|insert_id|timestamp)").unwrap();
}

/// 判断一行是否为头部行
#[must_use]
pub fn is_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

/// 判断一行是否为会话变量记账语句
#[must_use]
pub fn is_session_set(line: &str) -> bool {
    SET_RE.is_match(line)
}

/// 提取时间戳，旧格式优先
pub fn capture_time(line: &str) -> Option<&str> {
    TIME_RE
        .captures(line)
        .or_else(|| TIME_TOKEN_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 提取 (user, host)
///
/// 主机优先取 `@` 后的主机名，为空时取方括号内的内容。
pub fn capture_user_host(line: &str) -> Option<(&str, &str)> {
    let caps = USER_RE.captures(line)?;
    let user = caps.get(1).map_or("", |m| m.as_str());
    let host = match caps.get(2).map(|m| m.as_str()) {
        Some(h) if !h.is_empty() => h,
        _ => caps.get(3).map_or("", |m| m.as_str()),
    };
    Some((user, host))
}

/// 提取管理命令，去掉一个结尾分号
pub fn capture_admin_command(line: &str) -> Option<&str> {
    ADMIN_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().strip_suffix(';').unwrap_or(m.as_str()))
}

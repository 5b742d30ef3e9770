//! 按行读取慢日志并跟踪字节偏移
//!
//! 偏移规则：行偏移是读到该行之前已消耗的字节数（从 `start_offset` 起算），
//! 本次会话读到的第一行之后，每行偏移再额外 +1。这个 +1 与已有的续读偏移保持一致，
//! 不要修改。
//!
//! 以下元信息行会被跳过（仅对长度 >= 20 字节的行生效）：
//!
//! ```text
//! /usr/local/bin/mysqld, Version: 5.6.15-62.0-log (binary). started with:
//! Tcp port: 3306  Unix socket: /var/lib/mysql/mysql.sock
//! Time                 Id Command    Argument
//! ```

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// 元信息行的最小长度（含换行符）
pub const META_MIN_LEN: usize = 20;

/// 一行有效内容及其偏移
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 行首字节偏移（已应用 +1 规则）
    pub offset: u64,
    /// 去掉换行符后的内容
    pub text: String,
}

/// 判断原始行（含换行符）是否为元信息行
#[must_use]
pub fn is_meta_line(raw: &[u8]) -> bool {
    raw.len() >= META_MIN_LEN
        && ((raw[0] == b'/' && raw.ends_with(b"with:\n"))
            || raw.starts_with(b"Time ")
            || raw.starts_with(b"Tcp ")
            || raw.starts_with(b"TCP "))
}

/// 行读取器
///
/// `start_offset > 0` 续读时，读到的第一行偏移就是 `start_offset`，不加 1。
/// 按“当前偏移是否为 0”决定是否加 1 的实现会给出 `start_offset + 1`，
/// 两者在续读场景下相差 1，比较不同来源的偏移时需要注意。
pub struct LineReader<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    start_offset: u64,
    bytes_read: u64,
    lines_read: u64,
}

impl<R: Read> LineReader<R> {
    /// 创建读取器；`start_offset` 是字节计数的起点
    pub fn new(inner: R, start_offset: u64) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::with_capacity(1024),
            start_offset,
            bytes_read: start_offset,
            lines_read: 0,
        }
    }

    /// 已完整消耗的字节位置，可作为下次续读的起点
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// 本次会话已读取的行数（含被跳过的元信息行）
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// 读取下一行有效内容。
    ///
    /// 返回 `Ok(None)` 表示输入结束。末尾没有换行符的残行视为尚未写完，
    /// 既不返回也不计入字节数。
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(b'\n', &mut self.buf)?;
            if n == 0 || self.buf.last() != Some(&b'\n') {
                return Ok(None);
            }

            let mut offset = self.bytes_read;
            self.bytes_read += n as u64;
            if self.lines_read > 0 {
                offset += 1;
            }
            self.lines_read += 1;

            if is_meta_line(&self.buf) {
                #[cfg(feature = "logging")]
                tracing::trace!("+{} 元信息行，跳过", offset);
                continue;
            }

            let mut end = n - 1;
            if end > 0 && self.buf[end - 1] == b'\r' {
                end -= 1;
            }
            let text = String::from_utf8_lossy(&self.buf[..end]).into_owned();
            return Ok(Some(Line { offset, text }));
        }
    }
}

impl<R: Read + Seek> LineReader<R> {
    /// 定位到 `start_offset`（为 0 时不做任何操作）
    pub fn seek_to_start(&mut self) -> io::Result<()> {
        if self.start_offset > 0 {
            self.reader.seek(SeekFrom::Start(self.start_offset))?;
        }
        Ok(())
    }
}

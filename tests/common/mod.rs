//! 集成测试公共模块

use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use tempfile::TempDir;

/// 创建测试用的慢日志文件
#[allow(dead_code)]
pub fn create_test_slowlog(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}

/// 标准 MySQL 慢日志：服务器启动信息 + 两个事件
#[allow(dead_code)]
pub const SAMPLE_SLOWLOG: &str = "\
/usr/sbin/mysqld, Version: 5.6.15-62.0-log (binary). started with:
Tcp port: 3306  Unix socket: /var/lib/mysql/mysql.sock
Time                 Id Command    Argument
# Time: 071015 21:43:52
# User@Host: root[root] @ localhost []
# Query_time: 2.000001  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 1
use shop;
SET timestamp=1192459432;
SELECT 1;
# Time: 071015 21:45:10
# User@Host: app[app] @  [10.0.0.7]
# Query_time: 0.500000  Lock_time: 0.000100 Rows_sent: 0  Rows_examined: 120
UPDATE orders
SET status = 'paid'
WHERE id = 7;
";

/// Percona 扩展格式，含 Schema、布尔指标与采样信息
#[allow(dead_code)]
pub const PERCONA_SLOWLOG: &str = "\
# Time: 2019-01-01T12:00:00.123456Z
# User@Host: bob[bob] @ db1 [192.168.1.10]  Id: 42
# Schema: shop  Last_errno: 0  Killed: 0
# Query_time: 0.100000  Lock_time: 0.000020  Rows_sent: 10  Rows_examined: 300  Rows_affected: 0
# Bytes_sent: 812  Tmp_tables: 0  Tmp_disk_tables: 0  Tmp_table_sizes: 0
# InnoDB_trx_id: 1A2B
# QC_Hit: No  Full_scan: Yes  Full_join: No  Tmp_table: No  Tmp_table_on_disk: No
# Filesort: No  Filesort_on_disk: No  Merge_passes: 0
#   InnoDB_IO_r_ops: 0  InnoDB_IO_r_bytes: 0  InnoDB_IO_r_wait: 0.000000
#   InnoDB_rec_lock_wait: 0.000000  InnoDB_queue_wait: 0.000000
# Log_slow_rate_type: query  Log_slow_rate_limit: 10
SET timestamp=1546344000;
SELECT * FROM orders WHERE total > 100;
";

/// 以管理命令结尾的事件
#[allow(dead_code)]
pub const ADMIN_SLOWLOG: &str = "\
# Time: 071015 21:43:52
# User@Host: root[root] @ localhost []
# Query_time: 0.000100  Lock_time: 0.000000 Rows_sent: 0  Rows_examined: 0
# administrator command: Quit;
# Time: 071015 21:43:53
# User@Host: root[root] @ localhost []
# Query_time: 0.000200  Lock_time: 0.000000 Rows_sent: 0  Rows_examined: 0
SELECT 2;
";

/// 每次 `read` 只返回一行的读取器，可在读到指定行后触发回调
#[allow(dead_code)]
pub struct SteppedReader<F: FnMut(usize)> {
    lines: Vec<Vec<u8>>,
    next: usize,
    on_line: F,
}

#[allow(dead_code)]
impl<F: FnMut(usize)> SteppedReader<F> {
    pub fn new(content: &str, on_line: F) -> Self {
        let lines = content.split_inclusive('\n').map(|l| l.as_bytes().to_vec()).collect();
        Self { lines, next: 0, on_line }
    }
}

impl<F: FnMut(usize)> Read for SteppedReader<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(line) = self.lines.get(self.next) else {
            return Ok(0);
        };
        assert!(buf.len() >= line.len(), "test lines must fit the read buffer");
        buf[..line.len()].copy_from_slice(line);
        let n = line.len();
        (self.on_line)(self.next);
        self.next += 1;
        Ok(n)
    }
}

impl<F: FnMut(usize)> Seek for SteppedReader<F> {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "seek not supported"))
    }
}

/// 先返回一段数据，随后每次读取都失败
#[allow(dead_code)]
pub struct FailingReader {
    data: Option<Vec<u8>>,
}

#[allow(dead_code)]
impl FailingReader {
    pub fn new(data: &str) -> Self {
        Self { data: Some(data.as_bytes().to_vec()) }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            None => Err(io::Error::other("disk on fire")),
        }
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Ok(0)
    }
}

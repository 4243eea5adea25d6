use std::collections::HashMap;
use std::io::Read;

use crate::archive::ArchiveSource;
use crate::core::{StripRecord, Year};
use crate::error::ArchiveError;
use crate::stats::ScanStats;

/// 建好的漫画索引（只读）
///
/// 启动时由 [`build_index`](crate::index::build_index) 一次性构建，之后没有任何写入方，
/// 多个请求可以直接共享 `&StripIndex` / `Arc<StripIndex>` 并发读取，无需加锁。
///
/// ## 不变量
/// - `years` 严格升序、无重复，且与 `by_year` 的 key 集合一致。
/// - `by_year` 中每个年份至少有一条记录，按日期稳定升序。
/// - `by_path` 只包含被接收的条目。
pub struct StripIndex {
    source: Box<dyn ArchiveSource>,
    /// 归档路径 -> source.entries() 下标
    by_path: HashMap<String, usize>,
    by_year: HashMap<Year, Vec<StripRecord>>,
    years: Vec<Year>,
    stats: ScanStats,
}

impl StripIndex {
    pub(crate) fn from_parts(
        source: Box<dyn ArchiveSource>,
        by_path: HashMap<String, usize>,
        by_year: HashMap<Year, Vec<StripRecord>>,
        years: Vec<Year>,
        stats: ScanStats,
    ) -> Self {
        Self {
            source,
            by_path,
            by_year,
            years,
            stats,
        }
    }

    /// 所有年份（升序）
    pub fn list_years(&self) -> &[Year] {
        &self.years
    }

    /// 某一年的漫画（按日期升序）；年份不存在返回 None
    pub fn list_strips(&self, year: &str) -> Option<&[StripRecord]> {
        self.by_year.get(year).map(Vec::as_slice)
    }

    /// 打开一条漫画的内容流。
    ///
    /// `Ok(None)` 表示路径不在索引中；`Err` 表示条目存在但无法读取。
    /// 返回的流归调用方所有，drop 即释放。
    pub fn open_strip(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>, ArchiveError> {
        let Some(&slot) = self.by_path.get(path) else {
            return Ok(None);
        };
        let entry = &self.source.entries()[slot];
        self.source.open(entry).map(Some)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// 被接收的漫画数；重复路径在建索引时已被剔除，
    /// 因此恒等于 `scan_stats().accepted`，也等于各年份记录数之和。
    pub fn strip_count(&self) -> usize {
        self.by_path.len()
    }

    pub fn scan_stats(&self) -> &ScanStats {
        &self.stats
    }
}

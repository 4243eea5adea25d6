use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::archive::{ArchiveSource, SevenZArchive};
use crate::core::{StripRecord, Year};
use crate::error::IndexError;
use crate::index::classify::{classify, Rejection};
use crate::index::StripIndex;
use crate::stats::ScanStats;

/// 打开 7z 归档并建索引（进程启动入口使用）
pub fn build_from_archive(path: &Path) -> Result<StripIndex, IndexError> {
    let archive = SevenZArchive::open(path)?;
    build_index(Box::new(archive))
}

/// 单线程顺序扫描全部条目，构建只读索引。
///
/// 单条条目的任何问题都只记录日志并跳过；唯一的失败是一条都没接收（[`IndexError::Empty`]）。
pub fn build_index(source: Box<dyn ArchiveSource>) -> Result<StripIndex, IndexError> {
    let started = Instant::now();

    let mut by_path: HashMap<String, usize> = HashMap::new();
    let mut by_year: HashMap<Year, Vec<StripRecord>> = HashMap::new();
    let mut stats = ScanStats::default();

    for (slot, entry) in source.entries().iter().enumerate() {
        // 重复路径：先到先得，保证 by_path 与 by_year 一一对应
        let verdict = classify(entry).and_then(|strip| {
            if by_path.contains_key(&entry.path) {
                Err(Rejection::DuplicatePath)
            } else {
                Ok(strip)
            }
        });
        match verdict {
            Ok(strip) => {
                by_path.insert(entry.path.clone(), slot);
                by_year.entry(strip.year.clone()).or_default().push(strip);
                stats.record_accept();
            }
            Err(reason) => {
                if reason == Rejection::NotRegular {
                    tracing::debug!("Skipping non-regular entry in archive {}", entry.path);
                } else {
                    tracing::info!("Skipping file in archive {}, {}", entry.path, reason);
                }
                stats.record_reject(reason);
            }
        }
    }

    let mut years: Vec<Year> = by_year.keys().cloned().collect();
    years.sort();

    // sort_by_key 是稳定排序：同日期保持扫描顺序
    by_year
        .par_iter_mut()
        .for_each(|(_, strips)| strips.sort_by_key(|s| s.date));

    tracing::info!("{}", stats);
    tracing::info!(
        "Archive scan finished in {:?}: {} strips across {} years",
        started.elapsed(),
        stats.accepted,
        years.len()
    );

    if stats.accepted == 0 {
        return Err(IndexError::Empty);
    }

    Ok(StripIndex::from_parts(source, by_path, by_year, years, stats))
}

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::index::Rejection;

/// 一次扫描的统计（建索引结束后只读）
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScanStats {
    /// 归档条目总数
    pub scanned: usize,
    /// 被接收的条目数
    pub accepted: usize,
    /// 按原因统计的跳过数
    #[serde(serialize_with = "serialize_rejections")]
    pub rejected: BTreeMap<Rejection, usize>,
}

impl ScanStats {
    pub fn record_accept(&mut self) {
        self.scanned += 1;
        self.accepted += 1;
    }

    pub fn record_reject(&mut self, reason: Rejection) {
        self.scanned += 1;
        *self.rejected.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, reason: Rejection) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

fn serialize_rejections<S: serde::Serializer>(
    m: &BTreeMap<Rejection, usize>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_map(m.iter().map(|(r, n)| (r.reason(), n)))
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Archive Scan ===")?;
        writeln!(f, "  Entries scanned:  {}", self.scanned)?;
        writeln!(f, "  Strips accepted:  {}", self.accepted)?;
        write!(f, "  Entries skipped:  {}", self.rejected_total())?;
        for reason in Rejection::ALL {
            let n = self.rejected_for(reason);
            if n > 0 {
                write!(f, "\n    {:<32} {}", reason.reason(), n)?;
            }
        }
        Ok(())
    }
}

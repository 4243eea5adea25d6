use std::io::{Cursor, Read};

use super::{ArchiveEntry, ArchiveSource, EntryKind};
use crate::error::ArchiveError;

/// 内存归档：测试与嵌入场景使用，条目顺序即扫描顺序。
#[derive(Default)]
pub struct MemoryArchive {
    entries: Vec<ArchiveEntry>,
    // 与 entries 一一对应；None 表示读取必然失败
    contents: Vec<Option<Vec<u8>>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        self.push(path, EntryKind::Regular, size, Some(data))
    }

    pub fn dir(self, path: &str) -> Self {
        self.push(path, EntryKind::Directory, 0, Some(Vec::new()))
    }

    pub fn symlink(self, path: &str) -> Self {
        self.push(path, EntryKind::Symlink, 0, Some(Vec::new()))
    }

    /// 常规文件，但 open 总是失败（模拟损坏的压缩块）
    pub fn unreadable(self, path: &str) -> Self {
        self.push(path, EntryKind::Regular, 0, None)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(mut self, path: &str, kind: EntryKind, size: u64, data: Option<Vec<u8>>) -> Self {
        self.entries.push(ArchiveEntry {
            path: path.to_string(),
            kind,
            size,
        });
        self.contents.push(data);
        self
    }
}

impl ArchiveSource for MemoryArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn open(&self, entry: &ArchiveEntry) -> Result<Box<dyn Read + Send>, ArchiveError> {
        let slot = self
            .entries
            .iter()
            .position(|e| e.path == entry.path)
            .ok_or_else(|| ArchiveError::read(&entry.path, "entry not present in archive"))?;

        match &self.contents[slot] {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(ArchiveError::read(&entry.path, "corrupt entry")),
        }
    }
}

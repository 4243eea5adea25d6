pub mod memory;
pub mod sevenz;

use std::io::Read;

use crate::error::ArchiveError;

pub use memory::MemoryArchive;
pub use sevenz::SevenZArchive;

/// 归档条目类型：只有 Regular 参与建索引
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    Other,
}

/// 归档内的一条记录（路径已规范化为 `/` 分隔的相对路径）
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl ArchiveEntry {
    pub fn is_regular(&self) -> bool {
        self.kind == EntryKind::Regular
    }
}

/// 归档数据源抽象：索引只依赖这一层，不关心具体解压格式。
///
/// ## 契约
/// - `entries` 在数据源生命周期内不变，索引以下标引用条目。
/// - `open` 每次调用返回独立的读取流，可被多个请求并发调用。
/// - `open` 允许在返回前把整个条目解码进内存（7z 后端即如此）：
///   此时解码失败只会在 `open` 处以 `ArchiveError::Read` 出现，
///   返回的流不会再产生读取错误。流式后端则可能在读取途中出错。
pub trait ArchiveSource: Send + Sync {
    fn entries(&self) -> &[ArchiveEntry];
    fn open(&self, entry: &ArchiveEntry) -> Result<Box<dyn Read + Send>, ArchiveError>;
}

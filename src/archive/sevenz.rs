use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader};

use super::{ArchiveEntry, ArchiveSource, EntryKind};
use crate::error::ArchiveError;

// p7zip 把 Unix mode 放在 windows_attributes 高 16 位，并置 0x8000 标记位
const UNIX_EXTENSION_BIT: u32 = 0x8000;
const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// 7z 归档数据源
///
/// 打开时只解析一次头部得到条目列表；读取条目时每次重新打开文件，
/// 各请求之间不共享解码器状态。
///
/// `open(entry)` 从头解码到目标条目（solid 归档无法随机访问），
/// 把整个条目读进内存后才返回；任何解码错误都在这一步报告。
pub struct SevenZArchive {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl SevenZArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let reader = open_reader(&path)?;

        let entries = reader
            .archive()
            .files
            .iter()
            .map(|f| ArchiveEntry {
                path: normalize_name(&f.name),
                kind: entry_kind(f),
                size: f.size,
            })
            .collect::<Vec<_>>();

        tracing::debug!("Opened archive {:?} with {} entries", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for SevenZArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn open(&self, entry: &ArchiveEntry) -> Result<Box<dyn Read + Send>, ArchiveError> {
        let mut reader = open_reader(&self.path).map_err(|e| ArchiveError::read(&entry.path, e))?;

        let mut found: Option<Vec<u8>> = None;
        let mut io_err: Option<std::io::Error> = None;

        reader
            .for_each_entries(|f, data| {
                if normalize_name(&f.name) != entry.path {
                    return Ok(true);
                }
                let mut buf = Vec::with_capacity(f.size as usize);
                match data.read_to_end(&mut buf) {
                    Ok(_) => found = Some(buf),
                    Err(e) => io_err = Some(e),
                }
                // 找到目标后立即停止解码
                Ok(false)
            })
            .map_err(|e| ArchiveError::read(&entry.path, e))?;

        if let Some(e) = io_err {
            return Err(ArchiveError::read(&entry.path, e));
        }
        match found {
            Some(buf) => Ok(Box::new(Cursor::new(buf))),
            None => Err(ArchiveError::read(&entry.path, "entry not present in archive")),
        }
    }
}

fn open_reader(path: &Path) -> Result<SevenZReader<std::fs::File>, ArchiveError> {
    SevenZReader::open(path, Password::empty()).map_err(|e| ArchiveError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn normalize_name(name: &str) -> String {
    name.replace('\\', "/")
}

fn entry_kind(f: &SevenZArchiveEntry) -> EntryKind {
    if f.is_directory {
        return EntryKind::Directory;
    }
    if f.is_anti_item {
        return EntryKind::Other;
    }
    if f.has_windows_attributes && f.windows_attributes & UNIX_EXTENSION_BIT != 0 {
        let mode = f.windows_attributes >> 16;
        if mode & S_IFMT == S_IFLNK {
            return EntryKind::Symlink;
        }
    }
    EntryKind::Regular
}

//! 单条归档条目的准入判定
//!
//! 路径约定：`<YYYY>/<YYYY-MM-DD...>.(jpg|gif)`，年份目录必须与文件名日期的年份一致。
//! 任何不符都只是一次“跳过”，不会中断整次扫描。

use std::fmt;

use chrono::{Datelike, NaiveDate};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::archive::ArchiveEntry;
use crate::core::{StripRecord, Year, DATE_FORMAT};

/// URL 路径段编码：保留 unreserved 与 `$ & + = : @`；`, ; / ?` 一律转义
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

const ACCEPTED_EXTENSIONS: [&str; 2] = ["jpg", "gif"];
const DATE_PREFIX_LEN: usize = 10;
const URL_PREFIX: &str = "/comics/";

/// 拒绝原因（按判定顺序排列）
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rejection {
    NotRegular,
    UnmatchedFileType,
    YearFolderFormat,
    DateFormat,
    MalformedDate,
    YearMismatch,
    UnexpectedDepth,
    /// 同一路径已被接收过（由建索引阶段判定）
    DuplicatePath,
}

impl Rejection {
    pub const ALL: [Rejection; 8] = [
        Rejection::NotRegular,
        Rejection::UnmatchedFileType,
        Rejection::YearFolderFormat,
        Rejection::DateFormat,
        Rejection::MalformedDate,
        Rejection::YearMismatch,
        Rejection::UnexpectedDepth,
        Rejection::DuplicatePath,
    ];

    pub fn reason(self) -> &'static str {
        match self {
            Rejection::NotRegular => "not a regular file",
            Rejection::UnmatchedFileType => "unmatched file type",
            Rejection::YearFolderFormat => "year folder format mismatch",
            Rejection::DateFormat => "date format mismatch",
            Rejection::MalformedDate => "malformed date",
            Rejection::YearMismatch => "year folder does not match date",
            Rejection::UnexpectedDepth => "unexpected path depth",
            Rejection::DuplicatePath => "duplicate path",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// 判定一条归档条目。纯函数，不打日志（日志由调用方统一输出）。
pub fn classify(entry: &ArchiveEntry) -> Result<StripRecord, Rejection> {
    if !entry.is_regular() {
        return Err(Rejection::NotRegular);
    }

    let path = entry.path.as_str();
    let (dir, file) = split_path(path);

    match extension(file) {
        Some(ext) if ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)) => {}
        _ => return Err(Rejection::UnmatchedFileType),
    }

    let year = Year::from_folder(base_name(dir)).ok_or(Rejection::YearFolderFormat)?;

    let b = file.as_bytes();
    if b.len() < DATE_PREFIX_LEN || b[4] != b'-' || b[7] != b'-' {
        return Err(Rejection::DateFormat);
    }

    let date = parse_date_prefix(b).ok_or(Rejection::MalformedDate)?;

    if !year.matches(date.year()) {
        return Err(Rejection::YearMismatch);
    }

    // 公开 URL 只能寻址 `<year>/<file>` 两段路径
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() != 2 {
        return Err(Rejection::UnexpectedDepth);
    }

    let url = format!(
        "{}{}/{}",
        URL_PREFIX,
        year,
        utf8_percent_encode(segments[1], PATH_SEGMENT)
    );

    Ok(StripRecord { date, year, url })
}

/// 拆成 (父目录, 文件名)；父目录保留结尾的 `/`
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..=i], &path[i + 1..]),
        None => ("", path),
    }
}

/// 清理父目录后取最后一段；空目录视为 `.`
fn base_name(dir: &str) -> &str {
    dir.split('/')
        .rev()
        .find(|s| !s.is_empty() && *s != ".")
        .unwrap_or(".")
}

fn extension(file: &str) -> Option<&str> {
    file.rfind('.').map(|i| &file[i + 1..])
}

/// 严格 `YYYY-MM-DD`：先逐位校验 ASCII 数字，再交给 chrono 做日历校验
fn parse_date_prefix(b: &[u8]) -> Option<NaiveDate> {
    let prefix = &b[..DATE_PREFIX_LEN];
    let digits_ok = prefix
        .iter()
        .enumerate()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    let s = std::str::from_utf8(prefix).ok()?;
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::EntryKind;

    fn regular(path: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            kind: EntryKind::Regular,
            size: 1,
        }
    }

    fn reject(path: &str) -> Rejection {
        classify(&regular(path)).expect_err(path)
    }

    #[test]
    fn accepts_well_formed_entry() {
        let rec = classify(&regular("1990/1990-01-02.jpg")).unwrap();
        assert_eq!(rec.year.as_str(), "1990");
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(1990, 1, 2).unwrap());
        assert_eq!(rec.url, "/comics/1990/1990-01-02.jpg");
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert!(classify(&regular("1990/1990-01-02.JPG")).is_ok());
        assert!(classify(&regular("1990/1990-01-02.Gif")).is_ok());
    }

    #[test]
    fn suffix_after_date_is_allowed() {
        let rec = classify(&regular("2001/2001-12-31 sunday.gif")).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2001, 12, 31).unwrap());
        assert_eq!(rec.url, "/comics/2001/2001-12-31%20sunday.gif");
    }

    #[test]
    fn url_escapes_like_a_path_segment() {
        let rec = classify(&regular("2001/2001-12-31#a?b&c=d@e.jpg")).unwrap();
        assert_eq!(rec.url, "/comics/2001/2001-12-31%23a%3Fb&c=d@e.jpg");

        let rec = classify(&regular("2001/2001-12-31,a;b.jpg")).unwrap();
        assert_eq!(rec.url, "/comics/2001/2001-12-31%2Ca%3Bb.jpg");

        let rec = classify(&regular("2001/2001-12-31$x+y:z~.gif")).unwrap();
        assert_eq!(rec.url, "/comics/2001/2001-12-31$x+y:z~.gif");
    }

    #[test]
    fn non_regular_entries_are_skipped() {
        for kind in [EntryKind::Directory, EntryKind::Symlink, EntryKind::Other] {
            let e = ArchiveEntry {
                path: "1990/1990-01-02.jpg".to_string(),
                kind,
                size: 0,
            };
            assert_eq!(classify(&e), Err(Rejection::NotRegular));
        }
    }

    #[test]
    fn rejection_scenarios() {
        assert_eq!(reject("1990/not-a-date.jpg"), Rejection::DateFormat);
        assert_eq!(reject("199/1990-01-02.jpg"), Rejection::YearFolderFormat);
        assert_eq!(reject("1991/1990-01-02.jpg"), Rejection::YearMismatch);
        assert_eq!(reject("1990/1990-01-02.png"), Rejection::UnmatchedFileType);
    }

    #[test]
    fn extension_checked_before_anything_else() {
        assert_eq!(reject("x/garbage"), Rejection::UnmatchedFileType);
        assert_eq!(reject("1990/1990-01-02.jpg.bak"), Rejection::UnmatchedFileType);
    }

    #[test]
    fn top_level_file_has_no_year_folder() {
        assert_eq!(reject("1990-01-02.jpg"), Rejection::YearFolderFormat);
    }

    #[test]
    fn short_or_misplaced_dashes() {
        assert_eq!(reject("1990/1990-1-2.jpg"), Rejection::DateFormat);
        assert_eq!(reject("1990/19900102.jpg"), Rejection::DateFormat);
    }

    #[test]
    fn malformed_dates() {
        assert_eq!(reject("1990/1990-13-01.jpg"), Rejection::MalformedDate);
        assert_eq!(reject("1990/1990-02-30.jpg"), Rejection::MalformedDate);
        assert_eq!(reject("1990/1990-0a-01.jpg"), Rejection::MalformedDate);
        assert_eq!(reject("1990/+990-01-01.jpg"), Rejection::MalformedDate);
        assert_eq!(reject("1990/1990-1 -01.jpg"), Rejection::MalformedDate);
        // 非 ASCII 字节落在日期前缀中
        assert_eq!(reject("1990/1990-é-01.jpg"), Rejection::MalformedDate);
    }

    #[test]
    fn folder_year_compared_verbatim() {
        assert_eq!(reject("0990/0990-01-01.jpg"), Rejection::YearMismatch);
        assert_eq!(reject("abcd/1990-01-01.jpg"), Rejection::YearMismatch);
    }

    #[test]
    fn leap_day_accepted() {
        assert!(classify(&regular("2000/2000-02-29.gif")).is_ok());
    }

    #[test]
    fn nested_paths_are_rejected() {
        assert_eq!(
            reject("dilbert/1990/1990-01-02.jpg"),
            Rejection::UnexpectedDepth
        );
    }

    #[test]
    fn accepted_year_always_matches_date() {
        let paths = [
            "1989/1989-04-16.gif",
            "1999/1999-12-31.jpg",
            "2023/2023-03-12.jpg",
            "2023/2022-03-12.jpg",
        ];
        for p in paths {
            if let Ok(rec) = classify(&regular(p)) {
                assert_eq!(rec.year.as_str(), rec.date.year().to_string());
            }
        }
    }
}

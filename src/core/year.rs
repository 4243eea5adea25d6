use std::fmt;

use serde::Serialize;

/// 年份目录名（原样保留的 4 字符字符串）
///
/// 不折叠成整数：与日期年份的交叉校验需要逐字比较目录名，
/// 例如 `0990` 与 990 年并不匹配。
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct Year(String);

impl Year {
    pub const LEN: usize = 4;

    /// 仅校验长度（字节数），内容是否为合法年份由日期交叉校验决定
    pub fn from_folder(name: &str) -> Option<Self> {
        (name.len() == Self::LEN).then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 与日期的年份（十进制、无前导零）逐字比较
    pub fn matches(&self, calendar_year: i32) -> bool {
        self.0 == calendar_year.to_string()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Year {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Year {
    fn borrow(&self) -> &str {
        &self.0
    }
}

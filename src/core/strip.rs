use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::Year;

/// 对外统一的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 一张已接收漫画的元数据（建索引时生成，之后不再修改）
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StripRecord {
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub year: Year,
    pub url: String,
}

fn serialize_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

// REDCapレコードID
//
// 呼び出し元が指定したID（自動採番無効時）と、
// REDCapが採番したID（自動採番有効時）の両方を表す。

use std::fmt;

/// REDCapレコードID
///
/// REDCapはレコードIDを文字列として扱うため、数値IDも10進表記の文字列で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// 文字列からレコードIDを作成
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// レコードIDを文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

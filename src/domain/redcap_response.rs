// REDCap APIレスポンス
//
// `returnContent=auto_ids`を指定したレコードインポートは、
// `"<新しいID>,<送信時のID>"`形式の文字列配列を返す。

use serde_json::Value;
use thiserror::Error;

use super::RecordId;

/// 自動採番IDの解析エラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutoIdParseError {
    /// レスポンスがJSON配列ではない
    #[error("インポートレスポンスがJSON配列ではありません: {0}")]
    NotAnArray(String),

    /// レスポンス配列が空
    #[error("インポートレスポンスにIDが含まれていません")]
    Empty,

    /// 先頭要素が文字列ではない
    #[error("インポートレスポンスの先頭要素が文字列ではありません: {0}")]
    NotAString(String),

    /// 先頭トークンが整数として解析できない
    #[error("レコードIDを整数として解析できません: {0}")]
    InvalidId(String),
}

/// レコードインポートのレスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct ImportResponse {
    /// HTTPステータスコード
    pub status: u16,
    /// レスポンスボディ（JSON）
    pub body: Value,
}

impl ImportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 2xxステータスかどうか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 自動採番されたレコードIDを取り出す
    ///
    /// 先頭要素をカンマで分割し、最初のトークンを整数として解析する。
    /// 例: `["12,1"]` → `12`
    pub fn assigned_record_id(&self) -> Result<RecordId, AutoIdParseError> {
        let ids = self
            .body
            .as_array()
            .ok_or_else(|| AutoIdParseError::NotAnArray(self.body.to_string()))?;

        let first = ids.first().ok_or(AutoIdParseError::Empty)?;
        let first = first
            .as_str()
            .ok_or_else(|| AutoIdParseError::NotAString(first.to_string()))?;

        // split は空文字列でも要素を1つ返す
        let token = first.split(',').next().unwrap_or_default().trim();
        let id: i64 = token
            .parse()
            .map_err(|_| AutoIdParseError::InvalidId(token.to_string()))?;

        Ok(RecordId::from(id))
    }
}

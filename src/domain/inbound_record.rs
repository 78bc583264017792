// 受信レコード
//
// ブラウザ側のjsPsychクライアントが送信するリクエストボディを解析する。
// ボディは要素数1のJSON配列で、その要素がREDCapにインポートされるレコードとなる。

use serde_json::{Map, Value};
use thiserror::Error;

use super::RecordId;

/// 受信レコードの解析エラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InboundRecordError {
    /// ボディがJSONとして解析できない
    #[error("JSONの解析に失敗: {0}")]
    InvalidJson(String),

    /// ボディがJSON配列ではない
    #[error("ボディがJSON配列ではありません")]
    NotAnArray,

    /// 配列の要素数が1ではない
    #[error("ボディは要素数1の配列である必要があります（要素数: {0}）")]
    UnexpectedLength(usize),

    /// 配列の要素がJSONオブジェクトではない
    #[error("レコードがJSONオブジェクトではありません")]
    NotAnObject,

    /// 必須フィールドが欠落
    #[error("必須フィールドがありません: {0}")]
    MissingField(&'static str),

    /// フィールドの型が不正
    #[error("フィールドの型が不正です: {field}（期待: {expected}）")]
    InvalidFieldType {
        /// フィールド名
        field: &'static str,
        /// 期待する型
        expected: &'static str,
    },

    /// auto_numberが"true"/"false"のいずれでもない
    #[error("auto_numberの値が不正です: {0}")]
    InvalidAutoNumber(String),
}

/// 検証済みの受信レコード
///
/// 元のボディ文字列はそのままREDCapの`data`パラメータとして転送されるため、
/// ここで取り出すのは中継処理が参照するフィールドのみ。
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRecord {
    raw_body: String,
    auto_number: bool,
    record_id: Option<RecordId>,
    task: String,
    jspsych_data: String,
}

impl InboundRecord {
    /// リクエストボディを解析して検証する
    ///
    /// # 検証内容
    /// - 要素数1のJSON配列であること
    /// - `auto_number`（"true"/"false"）と`task`（文字列）が存在すること
    /// - `jspsych_data`が文字列であること
    /// - `auto_number`が"false"の場合は`record_id`が存在すること
    ///
    /// `auto_number`が"true"の場合、`record_id`はREDCap側で無視されるため読み取らない。
    pub fn parse(body: &str) -> Result<Self, InboundRecordError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| InboundRecordError::InvalidJson(e.to_string()))?;

        let elements = value.as_array().ok_or(InboundRecordError::NotAnArray)?;
        let record = match elements.as_slice() {
            [single] => single.as_object().ok_or(InboundRecordError::NotAnObject)?,
            other => return Err(InboundRecordError::UnexpectedLength(other.len())),
        };

        let auto_number = parse_auto_number(record)?;
        let task = required_string(record, "task")?;
        let jspsych_data = required_string(record, "jspsych_data")?;

        let record_id = if auto_number {
            None
        } else {
            Some(parse_record_id(record)?)
        };

        Ok(Self {
            raw_body: body.to_string(),
            auto_number,
            record_id,
            task,
            jspsych_data,
        })
    }

    /// 受信したボディ文字列（REDCapにそのまま転送する）
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// REDCap側で自動採番するかどうか
    pub fn auto_number(&self) -> bool {
        self.auto_number
    }

    /// 呼び出し元が指定したレコードID（自動採番無効時のみ）
    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    /// タスク名
    pub fn task(&self) -> &str {
        &self.task
    }

    /// jsPsychの試行データ（JSON文字列）
    pub fn jspsych_data(&self) -> &str {
        &self.jspsych_data
    }

    /// ファイルアップロード先のフィールド名（`<タスク名小文字>_data`）
    pub fn upload_field(&self) -> String {
        format!("{}_data", self.task.to_lowercase())
    }
}

fn parse_auto_number(record: &Map<String, Value>) -> Result<bool, InboundRecordError> {
    match record.get("auto_number") {
        None | Some(Value::Null) => Err(InboundRecordError::MissingField("auto_number")),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(InboundRecordError::InvalidAutoNumber(other.to_string())),
    }
}

fn parse_record_id(record: &Map<String, Value>) -> Result<RecordId, InboundRecordError> {
    match record.get("record_id") {
        None | Some(Value::Null) => Err(InboundRecordError::MissingField("record_id")),
        Some(Value::String(s)) => Ok(RecordId::new(s.as_str())),
        Some(Value::Number(n)) => Ok(RecordId::new(n.to_string())),
        Some(_) => Err(InboundRecordError::InvalidFieldType {
            field: "record_id",
            expected: "string or number",
        }),
    }
}

fn required_string(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<String, InboundRecordError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(InboundRecordError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(InboundRecordError::InvalidFieldType {
            field,
            expected: "string",
        }),
    }
}

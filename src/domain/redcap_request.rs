// REDCap APIリクエストパラメータ
//
// レコードインポート（content=record）とファイルアップロード（content=file）の
// 固定形式のフォームフィールドを構築する。

use std::fmt;

use super::RecordId;

/// レコードインポートのフォームパラメータ
///
/// `content`、`action`などの固定値は`form_fields`で付与する。
#[derive(Clone, PartialEq)]
pub struct ImportParameters {
    token: String,
    force_auto_number: bool,
    data: String,
}

impl ImportParameters {
    /// インポートパラメータを作成
    ///
    /// # 引数
    /// * `token` - REDCap APIトークン
    /// * `force_auto_number` - REDCap側でレコードIDを採番するか
    /// * `data` - インポートするレコード（受信したJSON配列文字列をそのまま渡す）
    pub fn new(token: impl Into<String>, force_auto_number: bool, data: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            force_auto_number,
            data: data.into(),
        }
    }

    pub fn force_auto_number(&self) -> bool {
        self.force_auto_number
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// application/x-www-form-urlencodedで送信するフィールド一覧
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("token", self.token.as_str()),
            ("content", "record"),
            ("action", "import"),
            ("format", "json"),
            ("type", "flat"),
            ("overwriteBehavior", "normal"),
            ("forceAutoNumber", bool_str(self.force_auto_number)),
            ("data", self.data.as_str()),
            ("returnContent", "auto_ids"),
            ("returnFormat", "json"),
        ]
    }
}

// APIトークンをログに出さない
impl fmt::Debug for ImportParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportParameters")
            .field("force_auto_number", &self.force_auto_number)
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// ファイルアップロードのフォームパラメータ
#[derive(Clone, PartialEq)]
pub struct FileUploadParameters {
    token: String,
    record: RecordId,
    field: String,
}

impl FileUploadParameters {
    /// アップロードパラメータを作成
    ///
    /// # 引数
    /// * `token` - REDCap APIトークン
    /// * `record` - 添付先のレコードID（インポートで指定または採番されたID）
    /// * `field` - 添付先のファイルフィールド名
    pub fn new(token: impl Into<String>, record: RecordId, field: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            record,
            field: field.into(),
        }
    }

    pub fn record(&self) -> &RecordId {
        &self.record
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// multipartのファイルパートに付けるファイル名
    pub fn file_name(&self) -> String {
        format!("{}.json", self.field)
    }

    /// multipart/form-dataで送信するテキストフィールド一覧（ファイルパートを除く）
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("token", self.token.as_str()),
            ("content", "file"),
            ("action", "import"),
            ("record", self.record.as_str()),
            ("field", self.field.as_str()),
        ]
    }
}

impl fmt::Debug for FileUploadParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUploadParameters")
            .field("record", &self.record)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// 中継結果とAPI Gatewayプロキシレスポンス
///
/// インポート結果とアップロード結果をまとめ、
/// API Gateway（Lambdaプロキシ統合）が期待する形式に変換する。
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

/// CORSヘッダー名
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// 中継処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResult {
    /// レコードインポートのHTTPステータス
    pub import_status: u16,
    /// レコードインポートのレスポンスボディ
    pub import_response: Value,
    /// ファイルアップロードのHTTPステータス（未実行の場合はNone）
    pub file_upload_status: Option<u16>,
}

impl RelayResult {
    /// クライアントに返すボディ
    pub fn body(&self) -> Value {
        json!({
            "record_import_response": self.import_response,
            "file_upload_response": self.file_upload_status,
        })
    }
}

/// API Gatewayプロキシ統合のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub is_base64_encoded: bool,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    /// JSONボディのレスポンスを作成（CORSヘッダー付き）
    pub fn json(status_code: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            is_base64_encoded: false,
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// エラーレスポンスを作成
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::error_with_import(status_code, message, None)
    }

    /// エラーレスポンスを作成（インポート済みならその結果も含める）
    pub fn error_with_import(
        status_code: u16,
        message: &str,
        import_response: Option<&Value>,
    ) -> Self {
        let mut body = json!({ "error": message });
        if let Some(import_response) = import_response {
            body["record_import_response"] = import_response.clone();
        }
        Self::json(status_code, &body)
    }
}

impl From<&RelayResult> for ProxyResponse {
    /// ステータスコードはインポート結果のものを使う
    fn from(result: &RelayResult) -> Self {
        Self::json(result.import_status, &result.body())
    }
}

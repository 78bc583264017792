/// インポート中継ハンドラー
///
/// ブラウザから受信したレコードをREDCapにインポートし、
/// 続けて`jspsych_data`をファイルとして同じレコードに添付する。
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::{
    AutoIdParseError, FileUploadParameters, ImportParameters, InboundRecord, InboundRecordError,
    ProxyResponse, RecordId, RelayResult,
};
use crate::infrastructure::{RedcapApi, RedcapApiError};

/// インポート中継のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportRelayError {
    /// イベントに文字列のbodyがない
    #[error("リクエストボディがありません")]
    MissingBody,

    /// 受信レコードが不正
    #[error("受信レコードが不正です: {0}")]
    InvalidRecord(#[from] InboundRecordError),

    /// REDCap API呼び出しに失敗
    #[error("REDCap API呼び出しに失敗: {0}")]
    Upstream(#[from] RedcapApiError),

    /// 自動採番IDを解決できない（レコードはインポート済み）
    #[error("レコードIDを解決できません: {source}")]
    RecordIdResolution {
        #[source]
        source: AutoIdParseError,
        /// インポートのレスポンスボディ
        import_response: Value,
    },
}

impl ImportRelayError {
    /// クライアントに返すHTTPステータス
    ///
    /// 入力不正は400、上流に起因するものは502。
    pub fn status_code(&self) -> u16 {
        match self {
            ImportRelayError::MissingBody | ImportRelayError::InvalidRecord(_) => 400,
            ImportRelayError::Upstream(_) | ImportRelayError::RecordIdResolution { .. } => 502,
        }
    }

    /// インポート済みの場合、そのレスポンスボディ
    pub fn import_response(&self) -> Option<&Value> {
        match self {
            ImportRelayError::RecordIdResolution {
                import_response, ..
            } => Some(import_response),
            _ => None,
        }
    }
}

/// インポート中継ハンドラー
///
/// APIトークンは起動時に読み込んだ設定から受け取り、各リクエストに付与する。
pub struct ImportRelay<A>
where
    A: RedcapApi,
{
    api: A,
    api_token: String,
}

impl<A> ImportRelay<A>
where
    A: RedcapApi,
{
    pub fn new(api: A, api_token: impl Into<String>) -> Self {
        Self {
            api,
            api_token: api_token.into(),
        }
    }

    /// Lambdaイベントを処理してプロキシレスポンスを返す
    ///
    /// エラーはステータスコード付きのJSONレスポンスに変換する。
    pub async fn handle(&self, event: &Value) -> ProxyResponse {
        let result = match event.get("body").and_then(Value::as_str) {
            Some(body) => self.relay(body).await,
            None => Err(ImportRelayError::MissingBody),
        };

        match result {
            Ok(result) => ProxyResponse::from(&result),
            Err(err) => {
                error!(error = %err, "インポート中継に失敗");
                ProxyResponse::error_with_import(
                    err.status_code(),
                    &err.to_string(),
                    err.import_response(),
                )
            }
        }
    }

    /// リクエストボディを中継する
    ///
    /// # 処理フロー
    /// 1. ボディを解析・検証（アップロード対象も含めて事前に検証する）
    /// 2. レコードをインポート
    /// 3. インポートが2xxでなければアップロードせずに結果を返す
    /// 4. レコードIDを解決（指定ID、またはインポートレスポンスの採番ID）
    /// 5. `jspsych_data`を`<task>_data`フィールドにアップロード
    ///
    /// アップロードの失敗はロールバックせず、ステータスのみ結果に含める。
    /// 通信エラーでステータスが得られない場合は`None`とする。
    pub async fn relay(&self, body: &str) -> Result<RelayResult, ImportRelayError> {
        debug!(body = %body, "リクエストボディ受信");

        let record = InboundRecord::parse(body)?;
        info!(
            task = record.task(),
            auto_number = record.auto_number(),
            "レコードインポート開始"
        );

        let import_params =
            ImportParameters::new(&self.api_token, record.auto_number(), record.raw_body());
        let import_response = self.api.import_records(&import_params).await?;

        if !import_response.is_success() {
            warn!(
                status = import_response.status,
                body = %import_response.body,
                "レコードインポートが失敗したためファイルアップロードを省略"
            );
            return Ok(RelayResult {
                import_status: import_response.status,
                import_response: import_response.body,
                file_upload_status: None,
            });
        }

        let record_id = match record.record_id() {
            Some(id) => id.clone(),
            None => match import_response.assigned_record_id() {
                Ok(id) => id,
                Err(source) => {
                    return Err(ImportRelayError::RecordIdResolution {
                        source,
                        import_response: import_response.body,
                    });
                }
            },
        };

        let file_upload_status = self.upload(&record, record_id).await;

        Ok(RelayResult {
            import_status: import_response.status,
            import_response: import_response.body,
            file_upload_status,
        })
    }

    /// ファイルをアップロードし、HTTPステータスを返す
    ///
    /// インポートは完了しているため、失敗はエラーにせずログに残す。
    async fn upload(&self, record: &InboundRecord, record_id: RecordId) -> Option<u16> {
        let params = FileUploadParameters::new(&self.api_token, record_id, record.upload_field());
        info!(
            record = %params.record(),
            field = params.field(),
            "ファイルアップロード開始"
        );

        let status = match self
            .api
            .import_file(&params, record.jspsych_data().as_bytes().to_vec())
            .await
        {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    error = %err,
                    record = %params.record(),
                    "ファイルアップロードリクエスト失敗（インポート結果はそのまま返す）"
                );
                return None;
            }
        };

        if !(200..300).contains(&status) {
            warn!(
                status = status,
                record = %params.record(),
                "ファイルアップロードが失敗（インポート結果はそのまま返す）"
            );
        }

        Some(status)
    }
}

// RedcapClient - REDCap API用HTTPクライアント
//
// レコードインポート（フォームPOST）とファイルアップロード（multipart POST）を行う。
// レコードインポートは自動採番時にべき等ではなく、multipartボディは再送できないため、
// 再試行は行わない。

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use super::config::RedcapConfig;
use crate::domain::{FileUploadParameters, ImportParameters, ImportResponse};

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// REDCap API呼び出しのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RedcapApiError {
    /// HTTPクライアントの構築に失敗
    #[error("HTTPクライアントの構築に失敗: {0}")]
    ClientBuild(String),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// レスポンスボディがJSONとして解析できない
    #[error("レスポンスボディが不正です: status={status}, message={message}")]
    InvalidResponseBody {
        /// HTTPステータスコード
        status: u16,
        /// エラーメッセージ
        message: String,
    },
}

/// REDCap API操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait RedcapApi: Send + Sync {
    /// レコードをインポートする（content=record, action=import）
    ///
    /// # 戻り値
    /// * `Ok(ImportResponse)` - HTTPステータスとJSONボディ（非2xxも含む）
    /// * `Err(RedcapApiError)` - ネットワークエラー、またはボディがJSONでない
    async fn import_records(
        &self,
        params: &ImportParameters,
    ) -> Result<ImportResponse, RedcapApiError>;

    /// ファイルをアップロードする（content=file, action=import）
    ///
    /// # 引数
    /// * `params` - アップロードパラメータ
    /// * `content` - ファイル本体
    ///
    /// # 戻り値
    /// * `Ok(u16)` - HTTPステータスコード（非2xxも含む）
    /// * `Err(RedcapApiError)` - ネットワークエラー
    async fn import_file(
        &self,
        params: &FileUploadParameters,
        content: Vec<u8>,
    ) -> Result<u16, RedcapApiError>;
}

/// reqwestを使用したREDCap APIクライアント
#[derive(Clone)]
pub struct RedcapClient {
    client: Client,
    api_url: String,
}

impl std::fmt::Debug for RedcapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedcapClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl RedcapClient {
    /// 設定からRedcapClientを作成
    ///
    /// APIトークンはリクエストパラメータ側で渡すため、クライアントはURLのみ保持する。
    pub fn new(config: &RedcapConfig) -> Result<Self, RedcapApiError> {
        info!(api_url = %config.api_url(), "RedcapClientを初期化");

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RedcapApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

fn network_error(e: reqwest::Error) -> RedcapApiError {
    RedcapApiError::NetworkError(e.to_string())
}

#[async_trait]
impl RedcapApi for RedcapClient {
    #[instrument(skip(self, params), fields(force_auto_number = params.force_auto_number()))]
    async fn import_records(
        &self,
        params: &ImportParameters,
    ) -> Result<ImportResponse, RedcapApiError> {
        debug!(api_url = %self.api_url, "レコードをインポート");

        let response = self
            .client
            .post(&self.api_url)
            .form(&params.form_fields())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "レコードインポートリクエスト失敗");
                network_error(e)
            })?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                error!(status = status, error = %e, "インポートレスポンスがJSONではありません");
                RedcapApiError::InvalidResponseBody {
                    status,
                    message: e.to_string(),
                }
            } else {
                network_error(e)
            }
        })?;

        info!(status = status, "レコードインポート完了");
        Ok(ImportResponse::new(status, body))
    }

    #[instrument(skip(self, params, content), fields(record = %params.record(), field = params.field()))]
    async fn import_file(
        &self,
        params: &FileUploadParameters,
        content: Vec<u8>,
    ) -> Result<u16, RedcapApiError> {
        debug!(bytes = content.len(), "ファイルをアップロード");

        let mut form = Form::new();
        for (name, value) in params.form_fields() {
            form = form.text(name, value.to_string());
        }
        form = form.part("file", Part::bytes(content).file_name(params.file_name()));

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "ファイルアップロードリクエスト失敗");
                network_error(e)
            })?;

        let status = response.status().as_u16();
        info!(status = status, "ファイルアップロード完了");
        Ok(status)
    }
}

// REDCap API接続設定
//
// プロセス起動時に一度だけ環境変数から読み込み、以降は引数として受け渡す。

use std::fmt;

use thiserror::Error;
use url::Url;

/// APIエンドポイントのデフォルト値
pub const DEFAULT_REDCAP_API_URL: &str = "https://redcap.slms.ucl.ac.uk/api/";

/// REDCap設定エラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RedcapConfigError {
    /// 必須の環境変数が設定されていない
    #[error("必須の環境変数が設定されていません: {0}")]
    MissingEnvVar(String),

    /// エンドポイントURLが不正
    #[error("REDCap APIのURLが不正です: {0}")]
    InvalidUrl(String),
}

/// REDCap API接続設定
///
/// # フィールド
/// - `api_url`: REDCap APIエンドポイント (例: "https://redcap.example.org/api/")
/// - `api_token`: REDCap APIトークン（プロジェクト単位で発行される）
#[derive(Clone)]
pub struct RedcapConfig {
    api_url: Url,
    api_token: String,
}

impl RedcapConfig {
    /// 新しい設定を作成
    ///
    /// # 引数
    /// - `api_url`: REDCap APIエンドポイント（http/httpsの絶対URL）
    /// - `api_token`: APIトークン
    pub fn new(api_url: &str, api_token: impl Into<String>) -> Result<Self, RedcapConfigError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| RedcapConfigError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(RedcapConfigError::InvalidUrl(format!(
                "{}: スキームはhttpまたはhttpsである必要があります",
                api_url
            )));
        }

        Ok(Self {
            api_url,
            api_token: api_token.into(),
        })
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `REDCAP_API_TOKEN`: APIトークン（必須）
    /// - `REDCAP_API_URL`: APIエンドポイント（省略時は`DEFAULT_REDCAP_API_URL`）
    pub fn from_env() -> Result<Self, RedcapConfigError> {
        let api_token = std::env::var("REDCAP_API_TOKEN")
            .map_err(|_| RedcapConfigError::MissingEnvVar("REDCAP_API_TOKEN".to_string()))?;

        let api_url =
            std::env::var("REDCAP_API_URL").unwrap_or_else(|_| DEFAULT_REDCAP_API_URL.to_string());

        Self::new(&api_url, api_token)
    }

    /// APIエンドポイントを取得
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// APIトークンを取得
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl fmt::Debug for RedcapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedcapConfig")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

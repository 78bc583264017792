/// REDCap送信Lambdaエントリポイント
///
/// API Gateway（プロキシ統合）経由で受信した実験データをREDCapにインポートし、
/// jsPsychデータをファイルとして添付する。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use redcap_relay::application::ImportRelay;
use redcap_relay::infrastructure::{init_logging, RedcapApi, RedcapClient, RedcapConfig};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // 設定は起動時に一度だけ読み込み、以降の呼び出しで共有する
    let config = RedcapConfig::from_env()?;
    let client = RedcapClient::new(&config)?;
    let relay = ImportRelay::new(client, config.api_token());

    info!(api_url = %config.api_url(), "submit Lambda関数を初期化");

    let relay = &relay;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(relay, event).await
    }))
    .await
}

/// Lambda関数のメインハンドラー
///
/// 中継のエラーはプロキシレスポンスに変換済みのため、常にOkを返す。
async fn handler<A>(relay: &ImportRelay<A>, event: LambdaEvent<Value>) -> Result<Value, Error>
where
    A: RedcapApi,
{
    info!(request_id = %event.context.request_id, "submitリクエスト受信");

    let response = relay.handle(&event.payload).await;

    info!(status_code = response.status_code, "submitレスポンス送信");
    Ok(serde_json::to_value(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use redcap_relay::domain::{FileUploadParameters, ImportParameters, ImportResponse};
    use redcap_relay::infrastructure::RedcapApiError;
    use serde_json::json;

    /// 固定レスポンスを返すREDCap API
    struct StubRedcapApi;

    #[async_trait]
    impl RedcapApi for StubRedcapApi {
        async fn import_records(
            &self,
            _params: &ImportParameters,
        ) -> Result<ImportResponse, RedcapApiError> {
            Ok(ImportResponse::new(200, json!(["12,1"])))
        }

        async fn import_file(
            &self,
            _params: &FileUploadParameters,
            _content: Vec<u8>,
        ) -> Result<u16, RedcapApiError> {
            Ok(200)
        }
    }

    fn lambda_event(payload: Value) -> LambdaEvent<Value> {
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn test_handler_returns_proxy_response() {
        let relay = ImportRelay::new(StubRedcapApi, "token");
        let event = lambda_event(json!({
            "body": r#"[{"auto_number": "true", "task": "Flanker", "jspsych_data": "xyz"}]"#
        }));

        let response = handler(&relay, event).await.unwrap();

        assert_eq!(response["isBase64Encoded"], false);
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");

        let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["record_import_response"], json!(["12,1"]));
        assert_eq!(body["file_upload_response"], 200);
    }

    #[tokio::test]
    async fn test_handler_maps_invalid_input_to_400() {
        let relay = ImportRelay::new(StubRedcapApi, "token");
        let event = lambda_event(json!({ "body": "not json" }));

        let response = handler(&relay, event).await.unwrap();

        assert_eq!(response["statusCode"], 400);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    }
}

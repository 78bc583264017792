/// ログ基盤モジュール
///
/// CloudWatch Logs向けにJSON形式の構造化ログを出力する。
/// ログレベルは環境変数`RUST_LOG`で指定し、未指定時はinfo。
use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// 未指定時のログレベル
const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の1回のみ初期化する。
///
/// # 使用例
/// ```ignore
/// use redcap_relay::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!("submit Lambda started");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(false);

        // 他のサブスクライバーが登録済みでも失敗させない
        let _ = tracing_subscriber::registry()
            .with(env_filter(DEFAULT_LOG_LEVEL))
            .with(json_layer)
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}

// アプリケーション層モジュール
pub mod import_relay;

// 再エクスポート
pub use import_relay::{ImportRelay, ImportRelayError};

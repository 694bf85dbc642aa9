/// ログ基盤モジュール
///
/// - Lambda: JSON形式の構造化ログ（CloudWatch Logs向け）
/// - CLI（synth/e2e）: 人間が読みやすいcompact形式を標準エラー出力へ
///
/// どちらも`RUST_LOG`でフィルタリングし、未設定時はinfo。
use std::sync::Once;

use tracing::Span;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の呼び出しのみ初期化を実行する。
pub fn init_logging() {
    INIT.call_once(|| {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(true);

        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(json_layer)
            .init();
    });
}

/// CLI向けのログサブスクライバーを初期化する
pub fn init_cli_logging() {
    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(fmt_layer)
            .init();
    });
}

/// Lambda呼び出し1回分のspan
///
/// span内のログにリクエストIDと関数ARNが付与される。
pub fn invocation_span(request_id: &str, function_arn: &str) -> Span {
    tracing::info_span!(
        "invocation",
        request_id = %request_id,
        function_arn = %function_arn
    )
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

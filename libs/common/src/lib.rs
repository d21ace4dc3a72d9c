use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// tracing初期化（stdout は対話プロンプト用なので stderr に出力）
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// 値が "true"（大文字小文字を区別しない）ならフラグ有効
pub fn is_truthy(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

//! Logging setup for the Masu binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose spans and events are enabled by the default filter.
const WORKSPACE_TARGETS: [&str; 3] = ["masu_server", "masu_client", "masu_shared"];

/// Build the default `EnvFilter` directive used when `RUST_LOG` is not set.
///
/// Every workspace crate and the binary itself log at `default_log_level`.
/// `tower_http` is included so request traces from the router show up.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();
    directives.push(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    ));
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use masu_shared::logger::setup_logger;
///
/// setup_logger("masu-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_and_binary() {
        // テスト項目: デフォルトのフィルタにワークスペースの全 crate とバイナリが含まれる
        // given (前提条件):
        let binary_name = "masu-server";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert!(directive.contains("masu_server=debug"));
        assert!(directive.contains("masu_client=debug"));
        assert!(directive.contains("masu_shared=debug"));
        assert!(directive.contains("tower_http=debug"));
        // バイナリ名のハイフンはアンダースコアに変換される
        assert!(directive.ends_with("masu_server=debug,tower_http=debug"));
    }
}

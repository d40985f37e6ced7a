// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认诊断日志过滤规则
pub const DEFAULT_FILTER: &str = "warn,phsh_url=warn";

/// 构建诊断日志过滤器
///
/// 静默模式下关闭全部诊断输出；否则 `RUST_LOG` 优先，未设置时使用默认规则
pub fn build_filter(silent: bool) -> EnvFilter {
    if silent {
        return EnvFilter::new("off");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_telemetry(silent: bool) {
    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(build_filter(silent))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_filter_is_off() {
        assert_eq!(build_filter(true).to_string(), "off");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_telemetry(true);
        init_telemetry(false);
    }
}

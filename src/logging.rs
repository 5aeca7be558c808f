use crate::config::RunnerConfig;
use anyhow::Context;
use std::str::FromStr;

/// 설정된 레벨로 전역 `tracing` 구독자를 설치한다.
///
/// 이미 구독자가 설치되어 있으면 아무것도 바꾸지 않는다.
pub fn init_logging(config: &RunnerConfig) -> anyhow::Result<()> {
    let level = tracing::Level::from_str(&config.log_level)
        .with_context(|| format!("알 수 없는 로그 레벨: {}", config.log_level))?;
    if tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 통과하지 못한 Step 뒤에 남은 Step을 어떻게 분류할지 정한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    /// 남은 Step을 `Skipped`로 보고한다.
    #[default]
    Skipped,
    /// 남은 Step을 `Pending`으로 보고한다.
    Pending,
}

/// 스위트 실행 설정이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// 중첩 Step 확장의 최대 깊이.
    #[serde(default = "default_max_nested_depth")]
    pub max_nested_depth: usize,
    /// 실패 이후 Step의 분류.
    #[serde(default)]
    pub after_failure: FollowUpStatus,
    /// `tracing` 최대 레벨 (`trace`..`error`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_nested_depth: default_max_nested_depth(),
            after_failure: FollowUpStatus::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_max_nested_depth() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

/// YAML 파일을 읽어 실행 설정으로 역직렬화한다.
pub fn load_config_from_file(path: &Path) -> anyhow::Result<RunnerConfig> {
    let mut file = File::open(path)
        .with_context(|| format!("설정 파일을 열 수 없습니다: {}", path.display()))?;
    load_config_from_reader(&mut file)
}

/// Reader에서 YAML을 읽어 실행 설정으로 파싱한다.
pub fn load_config_from_reader<R: Read>(reader: &mut R) -> anyhow::Result<RunnerConfig> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Ok(RunnerConfig::default());
    }
    let config: RunnerConfig = serde_yaml::from_str(&buf).context("실행 설정 파싱 실패")?;
    Ok(config)
}

//! 핸들러가 돌려주는 오류와 실행 전체를 중단시키는 오류를 정의한다.

use std::fmt;

/// Step 핸들러가 실패를 알릴 때 사용하는 오류이다.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// 아직 구현되지 않은 Step임을 알린다.
    #[error("step is pending")]
    Pending,
    /// 메시지 기반 실패.
    #[error("{0}")]
    Failed(String),
    /// 임의의 하위 오류.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepError {
    /// 메시지로 실패를 만든다.
    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed(message.into())
    }

    /// 원인 체인을 포함한 진단 문자열을 만든다.
    pub fn diagnostic(&self) -> String {
        match self {
            StepError::Other(err) => format!("{err:#}"),
            other => other.to_string(),
        }
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        StepError::Failed(message)
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        StepError::Failed(message.to_string())
    }
}

/// 훅이 실행되는 스위트 경계이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuitePhase {
    /// 첫 시나리오 이전.
    BeforeSuite,
    /// 마지막 시나리오 이후.
    AfterSuite,
}

impl fmt::Display for SuitePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuitePhase::BeforeSuite => f.write_str("before-suite"),
            SuitePhase::AfterSuite => f.write_str("after-suite"),
        }
    }
}

/// 실행 전체를 중단시키는 오류이다.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 스위트 훅이 오류를 반환했다.
    #[error("{phase} hook #{index} failed: {source:#}")]
    SuiteHook {
        phase: SuitePhase,
        index: usize,
        source: anyhow::Error,
    },
}

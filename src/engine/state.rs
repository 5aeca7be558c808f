use crate::binder::BindError;
use std::fmt;
use std::time::Duration;

/// 스위트 실행 단계이다. `Done`은 종료 상태이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuiteState {
    /// 아직 실행 전.
    #[default]
    Idle,
    /// 시나리오 실행 중.
    Running,
    /// 실행 종료.
    Done,
}

/// Step이 실패로 분류된 구체적인 사유이다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepFailure {
    /// 캡처 값을 파라미터로 변환하지 못했다.
    #[error("step \"{step}\": {source}")]
    Binding { step: String, source: BindError },
    /// 핸들러가 오류를 반환했다.
    #[error("step \"{step}\" failed: {message}")]
    Handler { step: String, message: String },
    /// 핸들러 실행 중 패닉이 발생했다.
    #[error("step \"{step}\" panicked: {message}")]
    Panicked { step: String, message: String },
    /// 중첩 Step 중 하나가 실패했다.
    #[error("step \"{step}\" failed in nested step: {nested}")]
    Nested {
        step: String,
        nested: Box<StepFailure>,
    },
    /// 중첩 깊이 제한을 넘었다.
    #[error("step \"{step}\" exceeds the nested step depth limit of {limit}")]
    DepthExceeded { step: String, limit: usize },
    /// 핸들러 반환 종류가 등록된 종류와 다르다.
    #[error("step \"{step}\" handler returned {found} but was registered to return {expected}")]
    ReturnMismatch {
        step: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Step 실행 결과 분류이다.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// 정상 종료.
    Passed,
    /// 핸들러 오류, 바인딩 실패 또는 패닉.
    Failed(StepFailure),
    /// 매칭되는 패턴이 없다.
    Undefined,
    /// 핸들러가 아직 구현되지 않았음을 알렸다.
    Pending,
    /// 앞선 Step이 통과하지 못해 실행하지 않았다.
    Skipped,
}

impl StepOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, StepOutcome::Passed)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Passed => f.write_str("passed"),
            StepOutcome::Failed(failure) => write!(f, "failed: {failure}"),
            StepOutcome::Undefined => f.write_str("undefined"),
            StepOutcome::Pending => f.write_str("pending"),
            StepOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

/// 시나리오 최종 결과이다.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    /// 모든 Step이 통과했다.
    Passed,
    /// 처음으로 통과하지 못한 Step과 그 결과.
    Failed { step: String, outcome: StepOutcome },
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed)
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioOutcome::Passed => f.write_str("passed"),
            ScenarioOutcome::Failed { step, outcome } => {
                write!(f, "failed at step \"{step}\" ({outcome})")
            }
        }
    }
}

/// 한 Step의 실행 기록이다.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub text: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

/// 한 시나리오의 실행 기록이다.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub outcome: ScenarioOutcome,
    pub steps: Vec<StepResult>,
}

/// 결과 종류별 Step 수이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub undefined: usize,
    pub pending: usize,
    pub skipped: usize,
}

impl OutcomeCounts {
    pub(crate) fn record(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Passed => self.passed += 1,
            StepOutcome::Failed(_) => self.failed += 1,
            StepOutcome::Undefined => self.undefined += 1,
            StepOutcome::Pending => self.pending += 1,
            StepOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.undefined + self.pending + self.skipped
    }
}

/// 스위트 전체 실행 보고서이다.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// 실행 순서대로의 시나리오 결과.
    pub scenarios: Vec<ScenarioResult>,
    /// 미정의 Step에 대한 등록 코드 제안. 중복은 제거된다.
    pub snippets: Vec<String>,
    /// 보고서를 만든 시점의 스위트 단계. 정상 종료한 실행은 `Done`이다.
    pub state: SuiteState,
}

impl RunReport {
    /// 모든 시나리오가 통과했는지 여부.
    pub fn is_success(&self) -> bool {
        self.scenarios.iter().all(|s| s.outcome.is_passed())
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        self.scenarios
            .iter()
            .flat_map(|s| &s.steps)
            .for_each(|step| counts.record(&step.outcome));
        counts
    }

    pub fn failed_scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.scenarios.iter().filter(|s| !s.outcome.is_passed())
    }

    pub(crate) fn add_snippet(&mut self, snippet: String) {
        if !self.snippets.contains(&snippet) {
            self.snippets.push(snippet);
        }
    }
}

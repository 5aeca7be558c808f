//! 스위트/시나리오/Step 경계에서 실행되는 라이프사이클 훅.
//!
//! 훅은 등록 순서대로 끝까지 실행된다. 훅 안의 패닉은 잡지 않으므로 전체 실행을
//! 중단시키며, 스위트 훅이 반환한 오류 역시 실행을 중단시킨다. Step 핸들러의
//! 패닉만 Step 단위로 격리된다.

use crate::engine::{ScenarioOutcome, StepOutcome};
use crate::error::{EngineError, SuitePhase};
use crate::scenario::{Scenario, Step};

/// 스위트 경계 훅.
type SuiteHook = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync + 'static>;

/// 시나리오 시작 훅.
type BeforeScenarioHook = Box<dyn Fn(&Scenario) + Send + Sync + 'static>;

/// 시나리오 종료 훅.
type AfterScenarioHook = Box<dyn Fn(&Scenario, &ScenarioOutcome) + Send + Sync + 'static>;

/// Step 시작 훅.
type BeforeStepHook = Box<dyn Fn(&Step) + Send + Sync + 'static>;

/// Step 종료 훅.
type AfterStepHook = Box<dyn Fn(&Step, &StepOutcome) + Send + Sync + 'static>;

/// 스위트 단위 훅 목록이다.
#[derive(Default)]
pub struct SuiteHooks {
    before_suite: Vec<SuiteHook>,
    after_suite: Vec<SuiteHook>,
}

impl SuiteHooks {
    /// 첫 시나리오 전에 한 번 실행할 훅을 등록한다.
    pub fn before_suite<F>(&mut self, hook: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_suite.push(Box::new(hook));
    }

    /// 모든 시나리오가 끝난 뒤 한 번 실행할 훅을 등록한다.
    pub fn after_suite<F>(&mut self, hook: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_suite.push(Box::new(hook));
    }

    pub(crate) fn run(&self, phase: SuitePhase) -> Result<(), EngineError> {
        let hooks = match phase {
            SuitePhase::BeforeSuite => &self.before_suite,
            SuitePhase::AfterSuite => &self.after_suite,
        };
        for (index, hook) in hooks.iter().enumerate() {
            tracing::debug!(%phase, index, "running suite hook");
            hook().map_err(|source| EngineError::SuiteHook {
                phase,
                index,
                source,
            })?;
        }
        Ok(())
    }
}

/// 시나리오/Step 단위 훅 목록이다.
#[derive(Default)]
pub struct ScenarioHooks {
    before_scenario: Vec<BeforeScenarioHook>,
    after_scenario: Vec<AfterScenarioHook>,
    before_step: Vec<BeforeStepHook>,
    after_step: Vec<AfterStepHook>,
}

impl ScenarioHooks {
    /// 각 시나리오 시작 전에 실행할 훅을 등록한다.
    pub fn before_scenario<F>(&mut self, hook: F)
    where
        F: Fn(&Scenario) + Send + Sync + 'static,
    {
        self.before_scenario.push(Box::new(hook));
    }

    /// 각 시나리오 종료 후 최종 결과와 함께 실행할 훅을 등록한다.
    pub fn after_scenario<F>(&mut self, hook: F)
    where
        F: Fn(&Scenario, &ScenarioOutcome) + Send + Sync + 'static,
    {
        self.after_scenario.push(Box::new(hook));
    }

    /// 각 Step 실행 전에 실행할 훅을 등록한다.
    pub fn before_step<F>(&mut self, hook: F)
    where
        F: Fn(&Step) + Send + Sync + 'static,
    {
        self.before_step.push(Box::new(hook));
    }

    /// 각 Step 실행 후 결과와 함께 실행할 훅을 등록한다.
    ///
    /// 실패 시 추가 상태(스크린샷, 덤프 등)를 남기는 용도로 쓸 수 있다.
    pub fn after_step<F>(&mut self, hook: F)
    where
        F: Fn(&Step, &StepOutcome) + Send + Sync + 'static,
    {
        self.after_step.push(Box::new(hook));
    }

    pub(crate) fn run_before_scenario(&self, scenario: &Scenario) {
        self.before_scenario.iter().for_each(|hook| hook(scenario));
    }

    pub(crate) fn run_after_scenario(&self, scenario: &Scenario, outcome: &ScenarioOutcome) {
        self.after_scenario
            .iter()
            .for_each(|hook| hook(scenario, outcome));
    }

    pub(crate) fn run_before_step(&self, step: &Step) {
        self.before_step.iter().for_each(|hook| hook(step));
    }

    pub(crate) fn run_after_step(&self, step: &Step, outcome: &StepOutcome) {
        self.after_step.iter().for_each(|hook| hook(step, outcome));
    }
}

/// 두 종류의 훅 목록을 함께 보관한다.
#[derive(Default)]
pub struct LifecycleHooks {
    pub suite: SuiteHooks,
    pub scenario: ScenarioHooks,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn suite_hooks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = SuiteHooks::default();
        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            hooks.before_suite(move || {
                order.lock().expect("잠금 실패").push(label);
                Ok(())
            });
        }
        hooks.run(SuitePhase::BeforeSuite).expect("훅 실행 실패");
        hooks.run(SuitePhase::AfterSuite).expect("훅 실행 실패");
        assert_eq!(
            *order.lock().expect("잠금 실패"),
            vec!["first", "second", "third"]
        );
    }

    /// 오류를 낸 훅 이후의 훅은 실행되지 않는다.
    #[test]
    fn failing_suite_hook_stops_the_list() {
        let ran = Arc::new(Mutex::new(false));
        let mut hooks = SuiteHooks::default();
        hooks.after_suite(|| anyhow::bail!("cleanup failed"));
        let flag = Arc::clone(&ran);
        hooks.after_suite(move || {
            *flag.lock().expect("잠금 실패") = true;
            Ok(())
        });
        let err = hooks.run(SuitePhase::AfterSuite).expect_err("실패해야 함");
        assert!(matches!(
            err,
            EngineError::SuiteHook {
                phase: SuitePhase::AfterSuite,
                index: 0,
                ..
            }
        ));
        assert!(!*ran.lock().expect("잠금 실패"));
    }

    #[test]
    fn step_hooks_receive_outcome() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = ScenarioHooks::default();
        let sink = Arc::clone(&seen);
        hooks.after_step(move |step, outcome| {
            sink.lock()
                .expect("잠금 실패")
                .push(format!("{} => {}", step.text, outcome));
        });
        hooks.run_after_step(&Step::new("a step"), &StepOutcome::Skipped);
        assert_eq!(
            *seen.lock().expect("잠금 실패"),
            vec!["a step => skipped".to_string()]
        );
    }
}

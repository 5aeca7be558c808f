use super::events::{EngineEvent, Formatter};
use super::state::{RunReport, ScenarioOutcome, ScenarioResult, StepOutcome, StepResult, SuiteState};
use super::steps::StepExecutor;
use crate::config::{FollowUpStatus, RunnerConfig};
use crate::error::{EngineError, SuitePhase};
use crate::hooks::LifecycleHooks;
use crate::registry::StepRegistry;
use crate::scenario::{Scenario, Step};
use crate::snippet::undefined_snippet;
use std::time::Instant;

/// 등록된 Step 정의와 훅으로 시나리오를 순차 실행하는 스위트이다.
pub struct Suite {
    registry: StepRegistry,
    hooks: LifecycleHooks,
    config: RunnerConfig,
    state: SuiteState,
}

impl Suite {
    /// 설정이 끝난 레지스트리와 훅으로 스위트를 만든다.
    pub fn new(registry: StepRegistry, hooks: LifecycleHooks, config: RunnerConfig) -> Self {
        Self {
            registry,
            hooks,
            config,
            state: SuiteState::Idle,
        }
    }

    /// 모든 시나리오를 실행하고 보고서를 돌려준다.
    ///
    /// BeforeSuite 훅이 실패하면 어떤 시나리오도 실행하지 않고 오류를 반환한다.
    /// 시나리오 실패는 보고서에 기록될 뿐이며 AfterSuite 훅은 항상 실행된다.
    pub fn run<I>(
        mut self,
        scenarios: I,
        mut formatter: impl Formatter,
    ) -> Result<RunReport, EngineError>
    where
        I: IntoIterator<Item = Scenario>,
    {
        self.transition(SuiteState::Running);
        formatter.handle(&EngineEvent::SuiteStarted);
        self.hooks.suite.run(SuitePhase::BeforeSuite)?;
        let mut report = RunReport::default();
        for scenario in scenarios {
            let result = self.run_scenario(&scenario, &mut formatter, &mut report);
            report.scenarios.push(result);
        }
        self.hooks.suite.run(SuitePhase::AfterSuite)?;
        self.transition(SuiteState::Done);
        report.state = self.state;
        formatter.handle(&EngineEvent::SuiteFinished {
            counts: report.counts(),
        });
        Ok(report)
    }

    fn transition(&mut self, next: SuiteState) {
        tracing::debug!(from = ?self.state, to = ?next, "suite state changed");
        self.state = next;
    }

    /// 시나리오 하나를 실행한다.
    fn run_scenario(
        &self,
        scenario: &Scenario,
        formatter: &mut impl Formatter,
        report: &mut RunReport,
    ) -> ScenarioResult {
        tracing::info!(scenario = %scenario.name, steps = scenario.len(), "scenario started");
        formatter.handle(&EngineEvent::ScenarioStarted {
            name: scenario.name.clone(),
        });
        self.hooks.scenario.run_before_scenario(scenario);
        let mut first_failure: Option<(String, StepOutcome)> = None;
        let mut steps = Vec::with_capacity(scenario.len());
        for step in &scenario.steps {
            let started_at = Instant::now();
            self.hooks.scenario.run_before_step(step);
            let outcome = if first_failure.is_some() {
                self.follow_up_outcome()
            } else {
                self.evaluate_step(step, formatter, report)
            };
            self.hooks.scenario.run_after_step(step, &outcome);
            formatter.handle(&EngineEvent::StepFinished {
                step: step.text.clone(),
                outcome: outcome.clone(),
            });
            if first_failure.is_none() && !outcome.is_passed() {
                first_failure = Some((step.text.clone(), outcome.clone()));
            }
            steps.push(StepResult {
                text: step.text.clone(),
                outcome,
                duration: started_at.elapsed(),
            });
        }
        let outcome = match first_failure {
            None => ScenarioOutcome::Passed,
            Some((step, outcome)) => ScenarioOutcome::Failed { step, outcome },
        };
        self.hooks.scenario.run_after_scenario(scenario, &outcome);
        tracing::info!(scenario = %scenario.name, outcome = %outcome, "scenario finished");
        formatter.handle(&EngineEvent::ScenarioFinished {
            name: scenario.name.clone(),
            outcome: outcome.clone(),
        });
        ScenarioResult {
            name: scenario.name.clone(),
            outcome,
            steps,
        }
    }

    /// 최상위 Step을 매칭, 바인딩, 호출까지 진행해 분류한다.
    fn evaluate_step(
        &self,
        step: &Step,
        formatter: &mut impl Formatter,
        report: &mut RunReport,
    ) -> StepOutcome {
        let Some(found) = self.registry.lookup(&step.text) else {
            let snippet = undefined_snippet(step);
            tracing::warn!(step = %step.text, "no step definition matched");
            formatter.handle(&EngineEvent::StepUndefined {
                step: step.text.clone(),
                snippet: snippet.clone(),
            });
            report.add_snippet(snippet);
            return StepOutcome::Undefined;
        };
        formatter.handle(&EngineEvent::StepMatched {
            step: step.text.clone(),
            pattern: found.definition.pattern().as_str().to_string(),
            captures: found.captures.clone(),
        });
        StepExecutor::new(&self.registry, self.config.max_nested_depth).run_single_step(
            found,
            &step.text,
            step.argument.as_ref(),
            0,
        )
    }

    fn follow_up_outcome(&self) -> StepOutcome {
        match self.config.after_failure {
            FollowUpStatus::Skipped => StepOutcome::Skipped,
            FollowUpStatus::Pending => StepOutcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventLog;
    use crate::error::StepError;
    use crate::registry::Steps;
    use std::panic::AssertUnwindSafe;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn registry() -> StepRegistry {
        let mut registry = StepRegistry::new();
        registry
            .step("^S1 passes$", || -> Result<(), StepError> { Ok(()) })
            .expect("등록 실패");
        registry
            .step("^S3 is defined$", || -> Result<(), StepError> {
                panic!("건너뛴 Step이 호출됨")
            })
            .expect("등록 실패");
        registry
            .step("^it fails$", || -> Result<(), StepError> { Err("nope".into()) })
            .expect("등록 실패");
        registry
            .step("^a macro$", || -> Steps { vec!["S1 passes".into(), "it fails".into()] })
            .expect("등록 실패");
        registry
    }

    fn scenario(name: &str, steps: &[&str]) -> Scenario {
        Scenario::new(name, steps.iter().map(|s| Step::new(*s)).collect())
    }

    fn outcomes(result: &ScenarioResult) -> Vec<StepOutcome> {
        result.steps.iter().map(|s| s.outcome.clone()).collect()
    }

    /// 미정의 Step 이후의 Step은 정의되어 있어도 건너뛴다.
    #[test]
    fn steps_after_undefined_are_skipped() {
        let suite = Suite::new(registry(), LifecycleHooks::new(), RunnerConfig::default());
        let report = suite
            .run(
                vec![scenario("s", &["S1 passes", "S2 undefined", "S3 is defined"])],
                EventLog::default(),
            )
            .expect("실행 실패");
        let result = &report.scenarios[0];
        assert_eq!(
            outcomes(result),
            vec![StepOutcome::Passed, StepOutcome::Undefined, StepOutcome::Skipped]
        );
        assert_eq!(
            result.outcome,
            ScenarioOutcome::Failed {
                step: "S2 undefined".into(),
                outcome: StepOutcome::Undefined,
            }
        );
        assert_eq!(report.snippets.len(), 1);
    }

    #[test]
    fn follow_up_status_can_be_pending() {
        let config = RunnerConfig {
            after_failure: FollowUpStatus::Pending,
            ..RunnerConfig::default()
        };
        let suite = Suite::new(registry(), LifecycleHooks::new(), config);
        let report = suite
            .run(vec![scenario("s", &["it fails", "S3 is defined"])], EventLog::default())
            .expect("실행 실패");
        assert_eq!(outcomes(&report.scenarios[0])[1], StepOutcome::Pending);
    }

    /// 시나리오 실패 후에도 AfterSuite 훅은 정확히 한 번 실행된다.
    #[test]
    fn after_suite_runs_once_despite_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = LifecycleHooks::new();
        let counter = Arc::clone(&calls);
        hooks.suite.after_suite(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let suite = Suite::new(registry(), hooks, RunnerConfig::default());
        let report = suite
            .run(
                vec![scenario("a", &["it fails"]), scenario("b", &["a macro"])],
                EventLog::default(),
            )
            .expect("실행 실패");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.failed_scenarios().count(), 2);
    }

    /// BeforeSuite 훅 오류는 시나리오 실행 전에 전체 실행을 중단시킨다.
    #[test]
    fn before_suite_failure_aborts_run() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut hooks = LifecycleHooks::new();
        hooks.suite.before_suite(|| anyhow::bail!("database unavailable"));
        let counter = Arc::clone(&started);
        hooks.scenario.before_scenario(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let suite = Suite::new(registry(), hooks, RunnerConfig::default());
        let err = suite
            .run(vec![scenario("a", &["S1 passes"])], EventLog::default())
            .expect_err("실패해야 함");
        assert!(matches!(
            err,
            EngineError::SuiteHook {
                phase: SuitePhase::BeforeSuite,
                ..
            }
        ));
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hooks_see_every_step_and_the_final_outcome() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = LifecycleHooks::new();
        let sink = Arc::clone(&log);
        hooks.scenario.before_scenario(move |scenario| {
            sink.lock().expect("잠금 실패").push(format!("begin {}", scenario.name));
        });
        let sink = Arc::clone(&log);
        hooks.scenario.before_step(move |step| {
            sink.lock().expect("잠금 실패").push(format!("before {}", step.text));
        });
        let sink = Arc::clone(&log);
        hooks.scenario.after_step(move |step, outcome| {
            sink.lock()
                .expect("잠금 실패")
                .push(format!("after {} {}", step.text, outcome));
        });
        let sink = Arc::clone(&log);
        hooks.scenario.after_scenario(move |scenario, outcome| {
            sink.lock()
                .expect("잠금 실패")
                .push(format!("end {} {}", scenario.name, outcome.is_passed()));
        });
        let suite = Suite::new(registry(), hooks, RunnerConfig::default());
        suite
            .run(vec![scenario("s", &["it fails", "S1 passes"])], EventLog::default())
            .expect("실행 실패");
        assert_eq!(
            *log.lock().expect("잠금 실패"),
            vec![
                "begin s".to_string(),
                "before it fails".to_string(),
                "after it fails failed: step \"it fails\" failed: nope".to_string(),
                "before S1 passes".to_string(),
                "after S1 passes skipped".to_string(),
                "end s false".to_string(),
            ]
        );
    }

    #[test]
    fn formatter_receives_match_and_outcome_events() {
        let mut log = EventLog::default();
        let suite = Suite::new(registry(), LifecycleHooks::new(), RunnerConfig::default());
        suite
            .run(vec![scenario("s", &["S1 passes", "nothing here"])], &mut log)
            .expect("실행 실패");
        assert_eq!(log.events.first(), Some(&EngineEvent::SuiteStarted));
        assert!(log.events.contains(&EngineEvent::StepMatched {
            step: "S1 passes".into(),
            pattern: "^S1 passes$".into(),
            captures: vec![],
        }));
        assert!(log.events.iter().any(|e| matches!(
            e,
            EngineEvent::StepUndefined { step, .. } if step == "nothing here"
        )));
        assert!(matches!(
            log.events.last(),
            Some(EngineEvent::SuiteFinished { counts }) if counts.passed == 1 && counts.undefined == 1
        ));
    }

    #[test]
    fn empty_scenario_passes() {
        let suite = Suite::new(registry(), LifecycleHooks::new(), RunnerConfig::default());
        let report = suite
            .run(vec![scenario("empty", &[])], EventLog::default())
            .expect("실행 실패");
        assert!(report.is_success());
        assert_eq!(report.state, SuiteState::Done);
    }

    fn panic_text(payload: &(dyn std::any::Any + Send)) -> String {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default()
    }

    /// BeforeSuite 훅의 패닉은 잡지 않고 호출자에게 전파하며 시나리오는 시작되지 않는다.
    #[test]
    fn before_suite_panic_reaches_caller() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut hooks = LifecycleHooks::new();
        hooks.suite.before_suite(|| panic!("seed exploded"));
        let counter = Arc::clone(&started);
        hooks.scenario.before_scenario(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let suite = Suite::new(registry(), hooks, RunnerConfig::default());
        let payload = std::panic::catch_unwind(AssertUnwindSafe(|| {
            suite.run(vec![scenario("a", &["S1 passes"])], EventLog::default())
        }))
        .expect_err("패닉이 전파되어야 함");
        assert_eq!(panic_text(&*payload), "seed exploded");
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn before_scenario_panic_reaches_caller() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut hooks = LifecycleHooks::new();
        hooks.scenario.before_scenario(|_| panic!("no fixture"));
        let mut registry = StepRegistry::new();
        let counter = Arc::clone(&ran);
        registry
            .step("^counted$", move || -> Result<(), StepError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .expect("등록 실패");
        let suite = Suite::new(registry, hooks, RunnerConfig::default());
        let payload = std::panic::catch_unwind(AssertUnwindSafe(|| {
            suite.run(vec![scenario("a", &["counted"])], EventLog::default())
        }))
        .expect_err("패닉이 전파되어야 함");
        assert_eq!(panic_text(&*payload), "no fixture");
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    /// AfterStep 훅의 패닉은 Step 실패로 바뀌지 않고 실행 전체를 중단시킨다.
    #[test]
    fn after_step_panic_stops_the_run() {
        let after_suite = Arc::new(AtomicUsize::new(0));
        let mut hooks = LifecycleHooks::new();
        hooks.scenario.after_step(|step, _| panic!("dump failed for {}", step.text));
        let counter = Arc::clone(&after_suite);
        hooks.suite.after_suite(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let suite = Suite::new(registry(), hooks, RunnerConfig::default());
        let payload = std::panic::catch_unwind(AssertUnwindSafe(|| {
            suite.run(
                vec![scenario("a", &["S1 passes"]), scenario("b", &["S1 passes"])],
                EventLog::default(),
            )
        }))
        .expect_err("패닉이 전파되어야 함");
        assert_eq!(panic_text(&*payload), "dump failed for S1 passes");
        assert_eq!(after_suite.load(Ordering::SeqCst), 0);
    }
}

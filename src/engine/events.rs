use super::state::{OutcomeCounts, ScenarioOutcome, StepOutcome};
use std::sync::mpsc::Sender;

/// 엔진에서 포매터로 전달되는 이벤트 모델이다.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// 스위트 시작 알림.
    SuiteStarted,
    /// 시나리오 시작 알림.
    ScenarioStarted { name: String },
    /// Step 문장이 정의에 매칭됨.
    StepMatched {
        step: String,
        pattern: String,
        captures: Vec<String>,
    },
    /// Step 문장에 매칭되는 정의가 없음.
    StepUndefined { step: String, snippet: String },
    /// Step 종료 알림.
    StepFinished { step: String, outcome: StepOutcome },
    /// 시나리오 종료 알림.
    ScenarioFinished {
        name: String,
        outcome: ScenarioOutcome,
    },
    /// 스위트 종료 알림.
    SuiteFinished { counts: OutcomeCounts },
}

/// 엔진 이벤트를 받아 결과를 표시하거나 기록하는 수신자이다.
pub trait Formatter {
    fn handle(&mut self, event: &EngineEvent);
}

impl<F: Formatter + ?Sized> Formatter for &mut F {
    fn handle(&mut self, event: &EngineEvent) {
        (**self).handle(event);
    }
}

/// 채널로 이벤트를 중계한다. 수신 측이 닫혀 있으면 무시한다.
impl Formatter for Sender<EngineEvent> {
    fn handle(&mut self, event: &EngineEvent) {
        let _ = self.send(event.clone());
    }
}

/// 받은 이벤트를 순서대로 보관한다.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<EngineEvent>,
}

impl Formatter for EventLog {
    fn handle(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}

/// 모든 이벤트를 `tracing`으로 기록한다.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFormatter;

impl Formatter for TracingFormatter {
    fn handle(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::SuiteStarted => tracing::info!("suite started"),
            EngineEvent::ScenarioStarted { name } => tracing::info!(scenario = %name, "scenario started"),
            EngineEvent::StepMatched { step, pattern, .. } => {
                tracing::debug!(step = %step, pattern = %pattern, "step matched")
            }
            EngineEvent::StepUndefined { step, snippet } => {
                tracing::warn!(step = %step, "undefined step, implement it with:\n{snippet}")
            }
            EngineEvent::StepFinished { step, outcome } => match outcome {
                StepOutcome::Failed(failure) => tracing::error!(step = %step, %failure, "step failed"),
                other => tracing::info!(step = %step, outcome = %other, "step finished"),
            },
            EngineEvent::ScenarioFinished { name, outcome } => {
                tracing::info!(scenario = %name, outcome = %outcome, "scenario finished")
            }
            EngineEvent::SuiteFinished { counts } => tracing::info!(
                passed = counts.passed,
                failed = counts.failed,
                undefined = counts.undefined,
                pending = counts.pending,
                skipped = counts.skipped,
                "suite finished"
            ),
        }
    }
}

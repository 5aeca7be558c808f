use super::state::{StepFailure, StepOutcome};
use crate::binder::bind;
use crate::error::StepError;
use crate::registry::{HandlerOutput, StepMatch, StepRegistry};
use crate::scenario::StepArgument;
use std::panic::{self, AssertUnwindSafe};

mod nested;
mod utils;

use nested::expand_nested_steps;
use utils::{panic_message, return_name};

/// 매칭된 정의를 바인딩하고 호출해 결과를 분류한다.
///
/// 핸들러 호출은 패닉을 잡는 경계 안에서 수행되므로 어떤 실행 오류도 프로세스를
/// 중단시키지 않는다.
#[derive(Debug, Clone, Copy)]
pub(super) struct StepExecutor<'a> {
    registry: &'a StepRegistry,
    max_nested_depth: usize,
}

impl<'a> StepExecutor<'a> {
    pub(super) fn new(registry: &'a StepRegistry, max_nested_depth: usize) -> Self {
        Self {
            registry,
            max_nested_depth,
        }
    }

    /// 단일 Step 정의를 실행한다. `depth`는 최상위 Step이 0이다.
    pub(super) fn run_single_step(
        &self,
        found: StepMatch<'a>,
        text: &str,
        argument: Option<&StepArgument>,
        depth: usize,
    ) -> StepOutcome {
        let definition = found.definition;
        let args = match bind(&definition.signature().params, &found.captures, argument) {
            Ok(args) => args,
            Err(source) => {
                tracing::warn!(step = text, error = %source, "argument binding failed");
                return StepOutcome::Failed(StepFailure::Binding {
                    step: text.to_string(),
                    source,
                });
            }
        };
        let output = match panic::catch_unwind(AssertUnwindSafe(|| definition.handler().call(args)))
        {
            Ok(output) => output,
            Err(payload) => {
                let message = panic_message(&*payload);
                tracing::error!(step = text, panic = %message, "step handler panicked");
                return StepOutcome::Failed(StepFailure::Panicked {
                    step: text.to_string(),
                    message,
                });
            }
        };
        match (output, definition.is_nested()) {
            (HandlerOutput::Done(Ok(())), false) => StepOutcome::Passed,
            (HandlerOutput::Done(Err(StepError::Pending)), false) => StepOutcome::Pending,
            (HandlerOutput::Done(Err(err)), false) => StepOutcome::Failed(StepFailure::Handler {
                step: text.to_string(),
                message: err.diagnostic(),
            }),
            (HandlerOutput::Steps(steps), true) => expand_nested_steps(self, text, &steps, depth),
            (output, nested) => StepOutcome::Failed(StepFailure::ReturnMismatch {
                step: text.to_string(),
                expected: return_name(nested),
                found: return_name(matches!(output, HandlerOutput::Steps(_))),
            }),
        }
    }

    /// 문장을 레지스트리에서 찾아 실행한다. 매칭이 없으면 `Undefined`이다.
    pub(super) fn run_text(&self, text: &str, depth: usize) -> StepOutcome {
        match self.registry.lookup(text) {
            Some(found) => self.run_single_step(found, text, None, depth),
            None => {
                tracing::debug!(step = text, depth, "nested step is undefined");
                StepOutcome::Undefined
            }
        }
    }
}

use super::StepExecutor;
use crate::engine::state::{StepFailure, StepOutcome};

/// 핸들러가 돌려준 중첩 Step 문장을 순서대로 실행한다.
///
/// 처음으로 통과하지 못한 중첩 Step의 결과가 부모 Step의 결과가 되며 이후 문장은
/// 실행하지 않는다. 실패는 부모 문장으로 감싸고, `Undefined`/`Pending`은 그대로
/// 전달한다.
pub(super) fn expand_nested_steps(
    executor: &StepExecutor<'_>,
    parent: &str,
    steps: &[String],
    depth: usize,
) -> StepOutcome {
    let child_depth = depth + 1;
    if child_depth > executor.max_nested_depth {
        tracing::warn!(
            step = parent,
            limit = executor.max_nested_depth,
            "nested step depth limit exceeded"
        );
        return StepOutcome::Failed(StepFailure::DepthExceeded {
            step: parent.to_string(),
            limit: executor.max_nested_depth,
        });
    }
    for text in steps {
        tracing::debug!(parent, step = %text, depth = child_depth, "running nested step");
        match executor.run_text(text, child_depth) {
            StepOutcome::Passed => continue,
            StepOutcome::Failed(failure) => {
                return StepOutcome::Failed(StepFailure::Nested {
                    step: parent.to_string(),
                    nested: Box::new(failure),
                });
            }
            other => return other,
        }
    }
    StepOutcome::Passed
}

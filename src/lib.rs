//! Step 정의 레지스트리와 시나리오 실행 엔진.
//!
//! 시나리오의 Step 문장을 등록된 정규식 패턴에 매칭하고, 캡처 값을 타입이 지정된
//! 핸들러 파라미터로 변환해 호출한다. 실행은 스위트/시나리오/Step 라이프사이클 훅
//! 안에서 단일 스레드로 순차 진행된다.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use stepwise::{
//!     EventLog, LifecycleHooks, RunnerConfig, Scenario, Step, StepError, StepRegistry, Suite,
//! };
//!
//! let counter = Arc::new(AtomicI32::new(0));
//! let mut hooks = LifecycleHooks::new();
//! let seed = Arc::clone(&counter);
//! hooks.suite.before_suite(move || {
//!     seed.store(7, Ordering::SeqCst);
//!     Ok(())
//! });
//!
//! let mut registry = StepRegistry::new();
//! let expected = Arc::clone(&counter);
//! registry
//!     .step(r"^a counter is (\d+)$", move |value: i32| -> Result<(), StepError> {
//!         if value == expected.load(Ordering::SeqCst) {
//!             Ok(())
//!         } else {
//!             Err(format!("counter is not {value}").into())
//!         }
//!     })
//!     .expect("valid step");
//!
//! let scenario = Scenario::new("counter", vec![Step::new("a counter is 7")]);
//! let report = Suite::new(registry, hooks, RunnerConfig::default())
//!     .run(vec![scenario], EventLog::default())
//!     .expect("suite hooks succeed");
//! assert!(report.is_success());
//! ```

pub mod binder;
pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod registry;
pub mod scenario;
pub mod snippet;

pub use binder::{ArgValue, BindError, StepArgs};
pub use config::{FollowUpStatus, RunnerConfig, load_config_from_file, load_config_from_reader};
pub use engine::{
    EngineEvent, EventLog, Formatter, OutcomeCounts, RunReport, ScenarioOutcome, ScenarioResult,
    StepFailure, StepOutcome, StepResult, Suite, SuiteState, TracingFormatter,
};
pub use error::{EngineError, StepError, SuitePhase};
pub use hooks::{LifecycleHooks, ScenarioHooks, SuiteHooks};
pub use logging::init_logging;
pub use registry::{
    ArgKind, FromArg, HandlerOutput, IntoStepHandler, PatternSource, RegistryError, ReturnKind,
    Signature, StepDefinition, StepHandler, StepMatch, StepRegistry, StepReturn, Steps,
};
pub use scenario::{
    DocString, Scenario, Step, StepArgument, Table, TableRow, load_scenarios_from_file,
    load_scenarios_from_glob, load_scenarios_from_reader,
};

mod events;
mod runner;
mod state;
mod steps;

pub use events::{EngineEvent, EventLog, Formatter, TracingFormatter};
pub use runner::Suite;
pub use state::{
    OutcomeCounts, RunReport, ScenarioOutcome, ScenarioResult, StepFailure, StepOutcome,
    StepResult, SuiteState,
};

//! Recording build tool for tests.

use std::sync::{Arc, Mutex};

use kiln_core::{
    application::{
        ApplicationError, BuildStep,
        ports::{BuildContext, BuildTool},
    },
    error::KilnResult,
};

/// One call received by [`RecordingBuildTool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub step: BuildStep,
    pub target: Option<String>,
}

impl RecordedCall {
    pub fn configure() -> Self {
        Self {
            step: BuildStep::Configure,
            target: None,
        }
    }

    pub fn build(target: Option<&str>) -> Self {
        Self {
            step: BuildStep::Build,
            target: target.map(str::to_string),
        }
    }

    pub fn install() -> Self {
        Self {
            step: BuildStep::Install,
            target: None,
        }
    }
}

/// [`BuildTool`] that records every call and optionally fails at one step.
///
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingBuildTool {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    fail_at: Option<BuildStep>,
}

impl RecordingBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail whenever `step` is invoked.
    pub fn failing_at(step: BuildStep) -> Self {
        Self {
            calls: Arc::default(),
            fail_at: Some(step),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) -> KilnResult<()> {
        let step = call.step;
        self.calls
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .push(call);

        if self.fail_at == Some(step) {
            return Err(ApplicationError::BuildToolFailed {
                step,
                reason: "injected failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl BuildTool for RecordingBuildTool {
    fn configure(&self, _ctx: &BuildContext) -> KilnResult<()> {
        self.record(RecordedCall::configure())
    }

    fn build(&self, _ctx: &BuildContext, target: Option<&str>) -> KilnResult<()> {
        self.record(RecordedCall::build(target))
    }

    fn install(&self, _ctx: &BuildContext) -> KilnResult<()> {
        self.record(RecordedCall::install())
    }
}

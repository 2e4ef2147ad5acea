//! Build executor - the configure → build → install state machine.

use tracing::{debug, info, warn};

use crate::application::{
    ApplicationError, BuildStep,
    ports::{BuildContext, BuildTool},
};
use crate::error::KilnResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Configured,
    Built,
    Installed,
    Failed,
}

/// Wraps a [`BuildTool`] and refuses out-of-order steps.
///
/// `build` may run several times (one per target) once `configure`
/// succeeded; `install` needs at least one successful `build`. After any
/// failure every later step is refused.
pub struct BuildExecutor<'a> {
    tool: &'a dyn BuildTool,
    ctx: &'a BuildContext,
    state: State,
    completed: Vec<BuildStep>,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(tool: &'a dyn BuildTool, ctx: &'a BuildContext) -> Self {
        Self {
            tool,
            ctx,
            state: State::Fresh,
            completed: Vec::new(),
        }
    }

    pub fn context(&self) -> &BuildContext {
        self.ctx
    }

    /// Steps that succeeded, in call order.
    pub fn completed_steps(&self) -> &[BuildStep] {
        &self.completed
    }

    pub fn configure(&mut self) -> KilnResult<()> {
        match self.state {
            State::Fresh => {}
            State::Failed => return Err(self.aborted(BuildStep::Configure)),
            _ => {
                return Err(ApplicationError::StepRepeated {
                    step: BuildStep::Configure,
                }
                .into());
            }
        }

        info!(build_folder = %self.ctx.layout.build_folder.display(), "Configuring");
        let result = self.tool.configure(self.ctx);
        self.advance(BuildStep::Configure, State::Configured, result)
    }

    pub fn build(&mut self, target: Option<&str>) -> KilnResult<()> {
        match self.state {
            State::Configured | State::Built => {}
            State::Failed => return Err(self.aborted(BuildStep::Build)),
            State::Fresh => {
                return Err(ApplicationError::StepOutOfOrder {
                    requested: BuildStep::Build,
                    missing: BuildStep::Configure,
                }
                .into());
            }
            State::Installed => {
                return Err(ApplicationError::StepRepeated {
                    step: BuildStep::Build,
                }
                .into());
            }
        }

        info!(build_target = target.unwrap_or("<all>"), "Building");
        let result = self.tool.build(self.ctx, target);
        self.advance(BuildStep::Build, State::Built, result)
    }

    pub fn install(&mut self) -> KilnResult<()> {
        match self.state {
            State::Built => {}
            State::Failed => return Err(self.aborted(BuildStep::Install)),
            State::Installed => {
                return Err(ApplicationError::StepRepeated {
                    step: BuildStep::Install,
                }
                .into());
            }
            State::Fresh | State::Configured => {
                return Err(ApplicationError::StepOutOfOrder {
                    requested: BuildStep::Install,
                    missing: BuildStep::Build,
                }
                .into());
            }
        }

        info!(package_folder = %self.ctx.layout.package_folder.display(), "Installing");
        let result = self.tool.install(self.ctx);
        self.advance(BuildStep::Install, State::Installed, result)
    }

    fn advance(&mut self, step: BuildStep, next: State, result: KilnResult<()>) -> KilnResult<()> {
        match result {
            Ok(()) => {
                debug!(%step, "Build step succeeded");
                self.state = next;
                self.completed.push(step);
                Ok(())
            }
            Err(e) => {
                warn!(%step, error = %e, "Build step failed");
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    fn aborted(&self, requested: BuildStep) -> crate::error::KilnError {
        ApplicationError::BuildAborted { requested }.into()
    }
}

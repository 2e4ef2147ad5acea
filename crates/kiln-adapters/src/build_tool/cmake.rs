//! CMake build tool adapter.
//!
//! Shells out to `cmake` for each step:
//!
//! ```text
//! configure   cmake -S <source> -B <build> -D...
//! build       cmake --build <build> --config <bt> [--target t] [--parallel n]
//! install     cmake --install <build> --config <bt> --prefix <package>
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, info, instrument};

use kiln_core::{
    application::{
        ApplicationError, BuildStep,
        ports::{BuildContext, BuildTool},
    },
    error::KilnResult,
};

use super::toolchain::{self, DEPS_GENERATOR, TOOLCHAIN_GENERATOR, cmake_path, on_off};

/// Lines of stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// One `cmake` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: BuildStep,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// [`BuildTool`] backed by the `cmake` executable.
///
/// In dry-run mode commands are recorded and logged but never spawned, and
/// no toolchain file is written.
#[derive(Debug)]
pub struct CMakeTool {
    program: PathBuf,
    jobs: Option<usize>,
    dry_run: bool,
    history: Mutex<Vec<Invocation>>,
}

impl CMakeTool {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("cmake"),
            jobs: None,
            dry_run: false,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Use a specific `cmake` binary.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Parallel build jobs; `None` lets the native tool decide.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Every command run (or planned, in dry-run mode), in order.
    pub fn history(&self) -> Vec<Invocation> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    fn run(&self, step: BuildStep, args: Vec<String>, workdir: &Path) -> KilnResult<()> {
        let invocation = Invocation {
            step,
            program: self.program.clone(),
            args,
        };
        info!(command = %invocation, "Running");
        if let Ok(mut history) = self.history.lock() {
            history.push(invocation.clone());
        }

        if self.dry_run {
            return Ok(());
        }

        let spawn_failed = |e: io::Error| ApplicationError::BuildToolFailed {
            step,
            reason: format!("failed to run {}: {e}", invocation.program.display()),
        };
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failed)?;

        // stderr drains on its own thread while stdout is read here.
        let stderr = child.stderr.take().map(|pipe| {
            thread::spawn(move || {
                let mut kept = VecDeque::with_capacity(STDERR_TAIL_LINES);
                for line in BufReader::new(pipe).lines().map_while(Result::ok) {
                    debug!(%step, "{line}");
                    if kept.len() == STDERR_TAIL_LINES {
                        kept.pop_front();
                    }
                    kept.push_back(line);
                }
                kept
            })
        });
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                debug!(%step, "{line}");
            }
        }

        let status = child.wait().map_err(spawn_failed)?;
        let stderr_tail = stderr
            .and_then(|handle| handle.join().ok())
            .map(|lines| Vec::from(lines).join("\n"))
            .unwrap_or_default();

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(ApplicationError::BuildToolFailed {
                step,
                reason: format!("exit code {code}\n{stderr_tail}"),
            }
            .into());
        }

        Ok(())
    }

    fn write_toolchain(&self, ctx: &BuildContext) -> KilnResult<PathBuf> {
        let path = toolchain::toolchain_path(ctx);
        if self.dry_run {
            return Ok(path);
        }

        std::fs::create_dir_all(&ctx.layout.generators_folder)
            .and_then(|()| std::fs::write(&path, toolchain::render(ctx)))
            .map_err(|e| ApplicationError::FilesystemError {
                path: path.clone(),
                reason: format!("Failed to write toolchain file: {e}"),
            })?;
        debug!(path = %path.display(), "Toolchain written");
        Ok(path)
    }
}

impl Default for CMakeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildTool for CMakeTool {
    #[instrument(skip_all, fields(reference = %ctx.reference))]
    fn configure(&self, ctx: &BuildContext) -> KilnResult<()> {
        let toolchain = if ctx.has_generator(TOOLCHAIN_GENERATOR) {
            Some(self.write_toolchain(ctx)?)
        } else {
            None
        };
        let args = configure_args(ctx, toolchain.as_deref());
        self.run(BuildStep::Configure, args, &ctx.layout.source_folder)
    }

    #[instrument(skip_all, fields(reference = %ctx.reference))]
    fn build(&self, ctx: &BuildContext, target: Option<&str>) -> KilnResult<()> {
        let args = build_args(ctx, target, self.jobs);
        self.run(BuildStep::Build, args, &ctx.layout.source_folder)
    }

    #[instrument(skip_all, fields(reference = %ctx.reference))]
    fn install(&self, ctx: &BuildContext) -> KilnResult<()> {
        let args = install_args(ctx);
        self.run(BuildStep::Install, args, &ctx.layout.source_folder)
    }
}

// ── Argument construction ────────────────────────────────────────────────────

pub fn configure_args(ctx: &BuildContext, toolchain: Option<&Path>) -> Vec<String> {
    let layout = &ctx.layout;
    let mut args = vec![
        "-S".to_string(),
        cmake_path(&layout.source_folder),
        "-B".to_string(),
        cmake_path(&layout.build_folder),
    ];

    if let Some(toolchain) = toolchain {
        args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", cmake_path(toolchain)));
    }
    if !ctx.settings.compiler.is_multi_config() {
        args.push(format!("-DCMAKE_BUILD_TYPE={}", ctx.settings.build_type));
    }
    args.push(format!(
        "-DCMAKE_INSTALL_PREFIX={}",
        cmake_path(&layout.package_folder)
    ));
    if let Some(shared) = ctx.options.get_bool("shared") {
        args.push(format!("-DBUILD_SHARED_LIBS={}", on_off(shared)));
    }
    if ctx.has_generator(DEPS_GENERATOR) {
        args.push(format!(
            "-DCMAKE_PREFIX_PATH={}",
            cmake_path(&layout.generators_folder)
        ));
    }
    args
}

pub fn build_args(ctx: &BuildContext, target: Option<&str>, jobs: Option<usize>) -> Vec<String> {
    let mut args = vec![
        "--build".to_string(),
        cmake_path(&ctx.layout.build_folder),
        "--config".to_string(),
        ctx.settings.build_type.to_string(),
    ];
    if let Some(target) = target {
        args.extend(["--target".to_string(), target.to_string()]);
    }
    if let Some(jobs) = jobs {
        args.extend(["--parallel".to_string(), jobs.to_string()]);
    }
    args
}

pub fn install_args(ctx: &BuildContext) -> Vec<String> {
    vec![
        "--install".to_string(),
        cmake_path(&ctx.layout.build_folder),
        "--config".to_string(),
        ctx.settings.build_type.to_string(),
        "--prefix".to_string(),
        cmake_path(&ctx.layout.package_folder),
    ]
}

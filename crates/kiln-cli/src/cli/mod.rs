//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Build and package native libraries from recipes",
    long_about = "Kiln runs a recipe through its lifecycle (layout, requirements, \
                  build, package, package info) and drives CMake to produce a \
                  package folder.",
    after_help = "EXAMPLES:\n\
        \x20 kiln create dawg-logger --source ./dawg-logger\n\
        \x20 kiln create ./recipes/zlib -s build_type=Debug -o shared=True\n\
        \x20 kiln inspect dawg-logger --format json\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a recipe and publish its package folder.
    #[command(
        visible_alias = "c",
        about = "Build and package a recipe",
        after_help = "EXAMPLES:\n\
            \x20 kiln create dawg-logger --source ./dawg-logger\n\
            \x20 kiln create dawg-logger --source . -s build_type=Debug --jobs 8\n\
            \x20 kiln create dawg-logger --source . --dry-run"
    )]
    Create(CreateArgs),

    /// Show a recipe's metadata.
    #[command(
        about = "Show recipe metadata",
        after_help = "EXAMPLES:\n\
            \x20 kiln inspect dawg-logger\n\
            \x20 kiln inspect ./recipe.toml --format json"
    )]
    Inspect(RecipeArgs),

    /// Resolve the folder layout and package id without building.
    #[command(
        about = "Show the resolved folder layout",
        after_help = "EXAMPLES:\n\
            \x20 kiln layout dawg-logger --source .\n\
            \x20 kiln layout dawg-logger --source . -s build_type=Debug"
    )]
    Layout(LayoutArgs),

    /// List tool and host requirements.
    #[command(
        visible_alias = "reqs",
        about = "List declared requirements",
        after_help = "EXAMPLES:\n\
            \x20 kiln requirements dawg-logger\n\
            \x20 kiln reqs dawg-logger --format json"
    )]
    Requirements(RecipeArgs),

    /// Show what consumers of the package receive.
    #[command(
        about = "Show consumer package info",
        after_help = "EXAMPLES:\n\
            \x20 kiln info dawg-logger"
    )]
    Info(RecipeArgs),

    /// Initialise a Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init                   # default location\n\
            \x20 kiln init -c ./kiln.toml    # explicit path\n\
            \x20 kiln init --force           # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get build.workspace\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Arguments for commands that only need a recipe.
#[derive(Debug, Args)]
pub struct RecipeArgs {
    /// Built-in recipe name or path to a `recipe.toml`.
    #[arg(value_name = "RECIPE", help = "Built-in recipe name or path to recipe.toml")]
    pub recipe: String,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: Format,
}

/// Settings, options and folders for one build configuration.
#[derive(Debug, Args)]
pub struct ConfigurationArgs {
    /// Library source tree.
    #[arg(
        long = "source",
        value_name = "DIR",
        help = "Directory holding the library sources"
    )]
    pub source: PathBuf,

    /// Scratch directory for build trees and package folders.
    #[arg(
        long = "workspace",
        value_name = "DIR",
        help = "Build workspace (default: build.workspace from config)"
    )]
    pub workspace: Option<PathBuf>,

    /// Settings overrides, e.g. `build_type=Debug`.
    #[arg(
        short = 's',
        long = "setting",
        value_name = "KEY=VALUE",
        help = "Override a setting (repeatable)"
    )]
    pub settings: Vec<String>,

    /// Option assignments, e.g. `shared=True`.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "NAME=VALUE",
        help = "Set a recipe option (repeatable)"
    )]
    pub options: Vec<String>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `kiln create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Built-in recipe name or path to a `recipe.toml`.
    #[arg(value_name = "RECIPE", help = "Built-in recipe name or path to recipe.toml")]
    pub recipe: String,

    #[command(flatten)]
    pub configuration: ConfigurationArgs,

    /// Parallel build jobs.
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Parallel build jobs (default: build.jobs from config)"
    )]
    pub jobs: Option<u16>,

    /// Print the cmake commands instead of running them.
    #[arg(long = "dry-run", help = "Show the build commands without running them")]
    pub dry_run: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: Format,
}

// ── layout ────────────────────────────────────────────────────────────────────

/// Arguments for `kiln layout`.
#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Built-in recipe name or path to a `recipe.toml`.
    #[arg(value_name = "RECIPE", help = "Built-in recipe name or path to recipe.toml")]
    pub recipe: String,

    #[command(flatten)]
    pub configuration: ConfigurationArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: Format,
}

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    Table,
    /// Pretty-printed JSON.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `build.jobs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Plugin-driven JavaScript project generator",
    long_about = "kiln creates JavaScript projects from a preset: every plugin in the \
                  preset contributes package.json fields and template files, which are \
                  merged and written in one pass.",
    after_help = "EXAMPLES:\n\
        \x20 kiln create my-app\n\
        \x20 kiln create my-app --preset minimal --plugin router --skip-install\n\
        \x20 kiln list plugins\n\
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

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a preset.
    #[command(
        visible_alias = "c",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 kiln create my-app\n\
            \x20 kiln create my-app --preset ./presets/spa.toml\n\
            \x20 kiln create my-app --plugin router --config-files\n\
            \x20 kiln create my-app --dry-run"
    )]
    Create(CreateArgs),

    /// List builtin plugins and available presets.
    #[command(
        visible_alias = "ls",
        about = "List plugins and presets",
        after_help = "EXAMPLES:\n\
            \x20 kiln list\n\
            \x20 kiln list plugins\n\
            \x20 kiln list presets --format json"
    )]
    List(ListArgs),

    /// Initialise a kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init           # platform config directory\n\
            \x20 kiln init --local   # .kiln.toml in the current directory"
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

    /// Manage the kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get defaults.preset\n\
            \x20 kiln config set install.skip true\n\
            \x20 kiln config list"
    )]
    Config(ConfigCommands),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `kiln create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Project name or path. A plain name creates `./name`; a path like
    /// `../foo` places the project one level up and names it `foo`.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Preset name or path to a preset file.
    #[arg(
        short = 'p',
        long = "preset",
        value_name = "PRESET",
        help = "Preset name or preset file (default from config)"
    )]
    pub preset: Option<String>,

    /// Extra plugins on top of the preset.
    #[arg(
        long = "plugin",
        value_name = "ID",
        action = clap::ArgAction::Append,
        help = "Add a plugin by id or short name (repeatable)"
    )]
    pub plugins: Vec<String>,

    /// Move tool configs out of package.json into dedicated files.
    #[arg(long = "config-files", help = "Write babel/eslint/... config to dedicated files")]
    pub config_files: bool,

    #[arg(long = "skip-install", help = "Do not run the package installer")]
    pub skip_install: bool,

    /// Remove an existing directory first (destructive).
    #[arg(short = 'f', long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Build the project in memory and report what would be written.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Abort generation after this many seconds.
    #[arg(long = "timeout", value_name = "SECS", help = "Generation deadline in seconds")]
    pub timeout: Option<u64>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list; both when omitted.
    #[arg(value_enum, value_name = "WHAT")]
    pub what: Option<ListTarget>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Plugins,
    Presets,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON object.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.kiln.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

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
        /// Dotted key path, e.g. `defaults.preset`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

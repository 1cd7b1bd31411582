//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Terminal client for percept image surveys and questionnaires.
#[derive(Debug, Parser)]
#[command(name = "percept", version, disable_help_subcommand = true)]
pub struct Cli {
    /// File receiving the log; the terminal is taken by the UI.
    #[arg(long, global = true, default_value = "percept.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a pairwise image survey.
    Pairs(PairsArgs),
    /// Fill in a regular-question form.
    Form(FormArgs),
    /// Print a demo configuration as JSON.
    Demo {
        #[arg(value_enum)]
        kind: DemoKind,
    },
}

/// Where images come from and answers go to.
#[derive(Debug, Clone, Args)]
pub struct BackendArgs {
    /// Base URL that image and submission paths are resolved against.
    #[arg(long, default_value = "http://localhost:8000")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Use generated images and accept submissions locally.
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PairsArgs {
    /// Survey configuration JSON. Required unless `--offline`.
    #[arg(long, required_unless_present = "offline")]
    pub config: Option<PathBuf>,

    /// Title shown above the survey.
    #[arg(long, default_value = "Survey")]
    pub title: String,

    /// Time bar refresh interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Form configuration JSON. Required unless `--offline`.
    #[arg(long, required_unless_present = "offline")]
    pub config: Option<PathBuf>,

    /// Title shown above the form.
    #[arg(long, default_value = "Questions")]
    pub title: String,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Pre-paired occupations survey.
    Pairs,
    /// Occupations survey built from a question template.
    Template,
    /// Occupations questionnaire.
    Form,
}

//! # percept-cli
//!
//! Wires the HTTP backend (or the offline demo backend) into the terminal
//! frontends. The `percept` binary is a thin `main` over [`run`].

pub mod args;
pub mod logging;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use percept::{FormConfig, RegularForm, Submitter, SurveyConfig, SurveyError};
use percept_demo::{
    AnswerTimer, GeneratedImageLoader, LoggingSubmitter, occupations_form, occupations_survey,
    occupations_template_survey,
};
use percept_http::{HttpImageLoader, HttpSubmitter};
use percept_ratatui_form::{RatatuiForm, RatatuiFormError};
use percept_ratatui_survey::{RatatuiSurvey, RatatuiSurveyError, SurveyExit};

pub use args::{BackendArgs, Cli, Command, DemoKind, FormArgs, PairsArgs};

/// Read and validate a survey configuration file.
pub fn load_survey_config(path: &Path) -> anyhow::Result<SurveyConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read survey config {}", path.display()))?;
    SurveyConfig::from_json(&json)
        .with_context(|| format!("invalid survey config {}", path.display()))
}

/// Read and validate a form configuration file.
pub fn load_form_config(path: &Path) -> anyhow::Result<FormConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read form config {}", path.display()))?;
    FormConfig::from_json(&json).with_context(|| format!("invalid form config {}", path.display()))
}

/// A demo configuration, pretty-printed.
pub fn demo_json(kind: DemoKind) -> anyhow::Result<String> {
    let mut rng = rand::thread_rng();
    let json = match kind {
        DemoKind::Pairs => {
            serde_json::to_string_pretty(&occupations_survey(&mut rng, AnswerTimer::Random))?
        }
        DemoKind::Template => {
            serde_json::to_string_pretty(&occupations_template_survey(&mut rng))?
        }
        DemoKind::Form => serde_json::to_string_pretty(&occupations_form())?,
    };
    Ok(json)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Pairs(args) => run_pairs(args),
        Command::Form(args) => run_form(args),
        Command::Demo { kind } => {
            println!("{}", demo_json(kind)?);
            Ok(())
        }
    }
}

fn run_pairs(args: PairsArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_survey_config(path)?,
        None => occupations_survey(&mut rand::thread_rng(), AnswerTimer::Random),
    };
    let frontend = RatatuiSurvey::new()
        .with_title(args.title.clone())
        .with_tick_rate(Duration::from_millis(args.tick_ms));

    let backend = &args.backend;
    let exit = if backend.offline {
        tracing::info!("running offline");
        frontend.run(config, GeneratedImageLoader::new(), LoggingSubmitter::new())
    } else {
        let timeout = Duration::from_secs(backend.timeout);
        let loader = HttpImageLoader::with_timeout(&backend.base_url, timeout)?;
        let submitter = HttpSubmitter::with_timeout(&backend.base_url, timeout)?
            .with_csrf_token(config.csrf_token.clone());
        frontend.run(config, loader, submitter)
    };

    match exit {
        Ok(exit) => {
            report_survey(&exit);
            Ok(())
        }
        Err(RatatuiSurveyError::Cancelled) => {
            eprintln!("Survey cancelled, answers were not saved.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn report_survey(exit: &SurveyExit) {
    tracing::info!(answers = exit.answers.len(), outcome = ?exit.outcome, "survey finished");
    println!("{} answers recorded", exit.answers.len());
    if let Some(outcome) = &exit.outcome {
        println!("submission: {outcome:?}");
    }
    if let Some(next) = &exit.navigated_to {
        println!("continue at {next}");
    }
}

fn run_form(args: FormArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_form_config(path)?,
        None => occupations_form(),
    };
    let frontend = RatatuiForm::new().with_title(args.title.clone());

    let backend = &args.backend;
    let result = if backend.offline {
        fill_form(&frontend, config, LoggingSubmitter::new())
    } else {
        let timeout = Duration::from_secs(backend.timeout);
        let submitter = HttpSubmitter::with_timeout(&backend.base_url, timeout)?
            .with_csrf_token(config.csrf_token.clone());
        fill_form(&frontend, config, submitter)
    };

    match result {
        Ok(next_step) => {
            println!("Answers saved.");
            if let Some(next) = next_step {
                println!("continue at {next}");
            }
            Ok(())
        }
        Err(RatatuiFormError::Cancelled) => {
            eprintln!("Form cancelled, answers were not saved.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn fill_form<S: Submitter>(
    frontend: &RatatuiForm,
    config: FormConfig,
    submitter: S,
) -> Result<Option<String>, RatatuiFormError> {
    let mut form = RegularForm::new(config, submitter).map_err(SurveyError::from)?;
    frontend.run(&mut form)
}

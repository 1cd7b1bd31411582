//! # percept-ratatui-survey
//!
//! Ratatui frontend for percept pairwise image surveys.
//!
//! Each question shows two images side by side with a half-block preview,
//! the question text and, when configured, a time bar. Pick an image with
//! `1`/`2`, the arrow keys plus Enter, or a mouse click.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use percept::SurveyConfig;
//! use percept_http::{HttpImageLoader, HttpSubmitter};
//! use percept_ratatui_survey::RatatuiSurvey;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SurveyConfig::from_json(&std::fs::read_to_string("survey.json")?)?;
//!     let loader = HttpImageLoader::new("http://localhost:8000")?;
//!     let submitter = HttpSubmitter::new("http://localhost:8000")?;
//!
//!     let exit = RatatuiSurvey::new()
//!         .with_title("Occupations")
//!         .run(config, loader, submitter)?;
//!     println!("{} answers", exit.answers.len());
//!     Ok(())
//! }
//! ```

mod backend;
mod view;

pub use backend::{RatatuiSurvey, RatatuiSurveyError, SurveyExit, Theme};
pub use view::{ShownImage, TerminalView};

//! # percept
//!
//! Pairwise image surveys and regular-question forms. Frontend-agnostic.
//!
//! A [`Survey`] shows two images and a question, records which image the
//! respondent picks, and submits every answer as JSON once the images run
//! out or the time limit is reached. A [`RegularForm`] collects multiple
//! choice, matrix, agreement scale and short open answers with inline
//! validation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use percept::{Choice, Survey, SurveyConfig};
//!
//! let config = SurveyConfig::from_json(include_str!("occupations.json"))?;
//! let mut survey = Survey::builder(config, view, loader, submitter).start()?;
//!
//! // Feed events from the frontend loop
//! survey.choose(Choice::Left)?;
//! while survey.tick() { /* redraw */ }
//! ```
//!
//! ## Frontends
//!
//! Frontends implement [`SurveyView`] and own the event loop:
//! - `percept-ratatui-survey` - terminal survey
//! - `percept-ratatui-form` - terminal form
//!
//! Images and submissions go through [`ImageLoader`] and [`Submitter`];
//! `percept-http` implements both over HTTP.

// Re-export all types from percept-types
pub use percept_types::*;

mod survey;
pub use survey::{END_MESSAGE, Phase, SubmissionOutcome, Survey, SurveyBuilder, UNLOAD_MESSAGE};

mod regular_form;
pub use regular_form::{FormOutcome, RegularForm};

// Test backend for running surveys without a frontend
mod test_backend;
pub use test_backend::{RecordingView, StubLoader, StubSubmitter};

//! # percept-ratatui-form
//!
//! Ratatui frontend for percept regular-question forms.
//!
//! All questions are visible at once in a scrollable TUI form. Navigate
//! between questions with Tab/Shift+Tab, move within a question with the
//! arrow keys, pick with Space/Enter or the number keys and submit with the
//! button at the bottom (or F10). Validation and backend errors appear next
//! to the question they belong to.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use percept::{FormConfig, RegularForm};
//! use percept_http::HttpSubmitter;
//! use percept_ratatui_form::RatatuiForm;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = FormConfig::from_json(&std::fs::read_to_string("form.json")?)?;
//!     let submitter = HttpSubmitter::new("http://localhost:8000")?;
//!     let mut form = RegularForm::new(config, submitter)?;
//!
//!     let next_step = RatatuiForm::new().with_title("About you").run(&mut form)?;
//!     println!("continue at {next_step:?}");
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::{RatatuiForm, RatatuiFormError, Theme};

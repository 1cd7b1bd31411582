//! Core types for the percept crate.
//!
//! This crate provides the foundational types for pairwise image surveys:
//! - `Timer` and `TimeBar` - Stopwatch and per-question countdown state
//! - `QuestionGenerator` - Templated questions with random substitutions
//! - `Answer` - The canonical wire record for one answered pair
//! - `Modal` - Dialog model with typed actions
//! - `SurveyConfig` and `FormConfig` - Page-embedded configuration
//! - `RegularQuestion` - Multiple choice, matrix and open questions for forms
//! - `SurveyView`, `ImageLoader` and `Submitter` - Seams for frontends and I/O

mod timer;
pub use timer::{Clock, ManualClock, SystemClock, Timer};

mod time_bar;
pub use time_bar::{TimeBar, TimeBarState};

mod question;
pub use question::{GeneratedQuestion, PairQuestion, QuestionGenerator, QuestionTemplate};

mod random;
pub use random::{RandomSource, ScriptedPicks};

mod answer;
pub use answer::{Answer, AnswerImage, Choice};

mod modal;
pub use modal::{ActionButton, Modal, SurveyAction};

mod config;
pub use config::{FormConfig, ImageAddressing, QuestionSource, SurveyConfig};

mod regular;
pub use regular::{
    AGREEMENT_LABELS, FORM_ERROR_SUMMARY, RegularAnswer, RegularQuestion, RegularResponse,
    SCALE_POINTS,
};

mod error;
pub use error::{ConfigError, ImageLoadError, SubmitError, SurveyError};

mod traits;
pub use traits::{ImageLoader, LoadedImage, SubmitResponse, Submitter, SurveyView};

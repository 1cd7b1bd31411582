//! Ready-made surveys and offline backends for demos and frontend examples.
//!
//! The [`occupations`] module builds the occupations study: a pairwise face
//! survey ("Who of these is a Nurse?") and its follow-up questionnaire.
//! The [`offline`] module serves generated images and accepts submissions
//! without a server, so the terminal frontends can run anywhere.

pub mod occupations;
pub mod offline;

pub use occupations::{
    AnswerTimer, OCCUPATIONS, occupations_form, occupations_survey, occupations_template_survey,
};
pub use offline::{GeneratedImageLoader, LoggingSubmitter};

//! The regular-question form controller.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use percept_types::{
    ConfigError, FORM_ERROR_SUMMARY, FormConfig, RegularAnswer, RegularQuestion, RegularResponse,
    SubmitResponse, Submitter, SurveyError,
};

/// The result of a [`RegularForm::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The backend accepted the answers.
    Saved { next_step: Option<String> },
    /// The backend refused the answers; errors are now on the form.
    Rejected { status: u16 },
    /// No response was received; the form-level message says why.
    Failed,
}

/// A form of regular questions with draft answers and per-question errors.
///
/// Frontends edit drafts through [`response_mut`](Self::response_mut) and
/// read [`error`](Self::error) / [`summary`](Self::summary) to render
/// feedback next to each question and next to the submit button.
#[derive(Debug)]
pub struct RegularForm<S> {
    config: FormConfig,
    responses: Vec<RegularResponse>,
    errors: BTreeMap<usize, String>,
    summary: Option<String>,
    submitter: S,
}

impl<S: Submitter> RegularForm<S> {
    /// Create a form with empty drafts for every question.
    pub fn new(config: FormConfig, submitter: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let responses = config
            .questions
            .iter()
            .map(RegularQuestion::empty_response)
            .collect();
        Ok(Self {
            config,
            responses,
            errors: BTreeMap::new(),
            summary: None,
            submitter,
        })
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn questions(&self) -> &[RegularQuestion] {
        &self.config.questions
    }

    pub fn responses(&self) -> &[RegularResponse] {
        &self.responses
    }

    /// The draft of the question at `index`, for editing.
    pub fn response_mut(&mut self, index: usize) -> Option<&mut RegularResponse> {
        self.responses.get_mut(index)
    }

    /// The inline error of the question at `index`.
    pub fn error(&self, index: usize) -> Option<&str> {
        self.errors.get(&index).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<usize, String> {
        &self.errors
    }

    /// Drop the inline error of a question that is being edited.
    pub fn clear_error(&mut self, index: usize) {
        self.errors.remove(&index);
    }

    /// The message shown next to the submit button.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Validate every draft, replacing all previous errors.
    ///
    /// Returns the wire answers when every question is valid.
    pub fn validate(&mut self) -> Option<Vec<RegularAnswer>> {
        self.errors.clear();
        self.summary = None;

        let mut answers = Vec::with_capacity(self.responses.len());
        for (index, (question, response)) in
            self.config.questions.iter().zip(&self.responses).enumerate()
        {
            match question.validate(response) {
                Ok(answer) => answers.push(answer),
                Err(message) => {
                    tracing::warn!(
                        question = index,
                        kind = question.kind(),
                        error = %message,
                        "invalid answer"
                    );
                    self.errors.insert(index, message);
                }
            }
        }

        if self.errors.is_empty() {
            Some(answers)
        } else {
            self.summary = Some(FORM_ERROR_SUMMARY.to_string());
            None
        }
    }

    /// Validate and post the answers to `/survey/{survey_id}`.
    pub fn submit(&mut self) -> Result<FormOutcome, SurveyError> {
        let Some(answers) = self.validate() else {
            return Ok(FormOutcome::Invalid);
        };

        let body = serde_json::to_string(&answers)?;
        let url = self.config.post_path();
        tracing::info!(answers = answers.len(), %url, "submitting form");

        match self.submitter.submit(&url, &body) {
            Ok(response) if response.is_success() => Ok(FormOutcome::Saved {
                next_step: response.next_step(),
            }),
            Ok(response) => {
                tracing::error!(
                    status = response.status,
                    body = %response.body,
                    "the form was rejected"
                );
                self.apply_server_errors(&response);
                Ok(FormOutcome::Rejected {
                    status: response.status,
                })
            }
            Err(err) => {
                tracing::error!(error = %err, "could not submit the form");
                self.summary = Some(err.to_string());
                Ok(FormOutcome::Failed)
            }
        }
    }

    /// Render a `{"<question index>": "<message>"}` body inline.
    ///
    /// Keys that are not question indices become the form-level message, as
    /// does a body that is not such a map at all.
    fn apply_server_errors(&mut self, response: &SubmitResponse) {
        let Ok(map) = serde_json::from_str::<Map<String, Value>>(&response.body) else {
            self.summary = Some(response.body.clone());
            return;
        };

        let mut general = None;
        for (key, value) in map {
            let Some(message) = value.as_str() else {
                continue;
            };
            match key.parse::<usize>() {
                Ok(index) if index < self.responses.len() => {
                    self.errors.insert(index, message.to_string());
                }
                _ if general.is_none() => general = Some(message.to_string()),
                _ => {}
            }
        }

        self.summary = match general {
            Some(message) => Some(message),
            None if !self.errors.is_empty() => Some(FORM_ERROR_SUMMARY.to_string()),
            None => Some(response.body.clone()),
        };
    }
}

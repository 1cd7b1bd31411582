//! The pairwise image survey flow-controller.

use std::sync::Arc;

use percept_types::{
    ActionButton, Answer, Choice, Clock, GeneratedQuestion, ImageLoader, Modal, QuestionGenerator,
    QuestionSource, RandomSource, SubmitResponse, Submitter, SurveyAction, SurveyConfig,
    SurveyError, SurveyView, SystemClock, TimeBar, TimeBarState, Timer,
};

/// Leave confirmation shown while answers would be lost.
pub const UNLOAD_MESSAGE: &str =
    "The survey has not finished, and all the data will be lost. Are you sure you want to leave?";

/// Terminal message shown while the answers are being saved.
pub const END_MESSAGE: &str = "Loading...";

const IMAGE_ERROR_TITLE: &str = "Image loading error";
const IMAGE_ERROR_BODY: &str =
    "We could not load the images of the current question. What do you wish to do now?";
const SAVE_ERROR_TITLE: &str = "Error saving results";

/// Where the survey is in its question loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Images of the next pair are being fetched, or failed to load.
    AwaitingImages,
    /// A pair is shown and a click is expected.
    Presenting,
    /// The survey ended; answers were submitted.
    Ended,
}

/// How the final submission went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The backend answered 200.
    Saved { next_step: Option<String> },
    /// The backend answered with another status.
    Rejected { status: u16, body: String },
    /// No response was received.
    Failed { message: String },
}

#[derive(Debug)]
struct CurrentPair {
    left: String,
    right: String,
    question: GeneratedQuestion,
}

/// Builder for [`Survey`].
///
/// ```rust,ignore
/// let survey = Survey::builder(config, view, loader, submitter)
///     .clock(clock)
///     .random(ScriptedPicks::new([0, 1]))
///     .start()?;
/// ```
pub struct SurveyBuilder<V, L, S> {
    config: SurveyConfig,
    view: V,
    loader: L,
    submitter: S,
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl<V, L, S> SurveyBuilder<V, L, S>
where
    V: SurveyView,
    L: ImageLoader,
    S: Submitter,
{
    /// Read time from `clock` instead of the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Draw placeholder values from `random` instead of the thread RNG.
    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Validate the configuration, arm the leave confirmation and show the first pair.
    pub fn start(self) -> Result<Survey<V, L, S>, SurveyError> {
        self.config.validate()?;

        let generator = match &self.config.questions {
            QuestionSource::Template { question, .. } => {
                Some(QuestionGenerator::from_template(question.clone()))
            }
            QuestionSource::Pairs { .. } => None,
        };
        let time_bar = self
            .config
            .time_bar_duration
            .map(|seconds| TimeBar::with_clock(seconds, Arc::clone(&self.clock)));

        tracing::info!(
            pairs = self.config.questions.pair_count(),
            time_bar = ?self.config.time_bar_duration,
            duration = ?self.config.survey_duration(),
            "starting survey"
        );

        let mut survey = Survey {
            survey_timer: Timer::with_clock(Arc::clone(&self.clock)),
            question_timer: Timer::with_clock(Arc::clone(&self.clock)),
            config: self.config,
            generator,
            view: self.view,
            loader: self.loader,
            submitter: self.submitter,
            random: self.random,
            phase: Phase::AwaitingImages,
            cursor: 0,
            answers: Vec::new(),
            time_bar,
            current: None,
            outcome: None,
        };

        survey.view.set_unload_guard(Some(UNLOAD_MESSAGE));
        if let Some(bar) = &survey.time_bar {
            survey.view.render_time_bar(bar.state());
        }
        survey.advance()?;
        Ok(survey)
    }
}

/// A running pairwise image survey.
///
/// The survey owns its view, loader and submitter. The frontend feeds it
/// clicks ([`choose`](Self::choose)), modal button presses
/// ([`modal_action`](Self::modal_action)) and frame ticks ([`tick`](Self::tick)).
pub struct Survey<V, L, S> {
    config: SurveyConfig,
    generator: Option<QuestionGenerator>,
    view: V,
    loader: L,
    submitter: S,
    random: Box<dyn RandomSource>,
    phase: Phase,
    cursor: usize,
    answers: Vec<Answer>,
    survey_timer: Timer,
    question_timer: Timer,
    time_bar: Option<TimeBar>,
    current: Option<CurrentPair>,
    outcome: Option<SubmissionOutcome>,
}

impl<V, L, S> Survey<V, L, S>
where
    V: SurveyView,
    L: ImageLoader,
    S: Submitter,
{
    /// Start building a survey with the system clock and the thread RNG.
    pub fn builder(
        config: SurveyConfig,
        view: V,
        loader: L,
        submitter: S,
    ) -> SurveyBuilder<V, L, S> {
        SurveyBuilder {
            config,
            view,
            loader,
            submitter,
            clock: Arc::new(SystemClock),
            random: Box::new(rand::thread_rng()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Answers recorded so far, in click order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Index of the next entry of the question source to be shown.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// The question text currently shown, if a pair is presented.
    pub fn current_question(&self) -> Option<&str> {
        self.current.as_ref().map(|pair| pair.question.text.as_str())
    }

    pub fn time_bar_state(&self) -> Option<&TimeBarState> {
        self.time_bar.as_ref().map(TimeBar::state)
    }

    /// The result of the final submission, once the survey ended.
    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    /// Record the respondent's pick and move on.
    ///
    /// Rejected unless a pair is being presented.
    pub fn choose(&mut self, choice: Choice) -> Result<(), SurveyError> {
        if self.phase != Phase::Presenting {
            return Err(SurveyError::NotPresenting);
        }
        let Some(current) = self.current.take() else {
            return Err(SurveyError::NotPresenting);
        };

        let answer = Answer::new(
            current.left,
            current.right,
            choice,
            self.question_timer.seconds_passed(),
        )
        .with_variables(current.question.variables)
        .with_time_bar(self.config.time_bar_enabled())
        .with_user_id(self.config.user_id.clone());
        tracing::debug!(
            answer = self.answers.len(),
            chosen = answer.chosen_image(),
            seconds = answer.seconds_taken,
            "answer recorded"
        );
        self.answers.push(answer);

        self.phase = Phase::AwaitingImages;
        self.view.set_loading(true);
        if let Some(bar) = &mut self.time_bar {
            bar.reset();
            self.view.render_time_bar(bar.state());
        }

        let time_is_up = self
            .config
            .survey_duration()
            .is_some_and(|limit| self.survey_timer.seconds_passed() >= limit);
        if time_is_up || !self.config.questions.has_pair_at(self.cursor) {
            self.end()
        } else {
            self.advance()
        }
    }

    /// Dispatch a modal button.
    pub fn modal_action(&mut self, action: SurveyAction) -> Result<(), SurveyError> {
        match action {
            SurveyAction::ExitSurvey => {
                tracing::info!(url = %self.config.exit_url, "leaving survey");
                self.view.navigate(&self.config.exit_url);
                Ok(())
            }
            SurveyAction::Submit => self.end(),
        }
    }

    /// Refresh the time bar. Returns `false` once there is no time bar left to refresh.
    pub fn tick(&mut self) -> bool {
        let Some(bar) = &mut self.time_bar else {
            return false;
        };
        bar.update();
        self.view.render_time_bar(bar.state());
        true
    }

    /// End the survey and submit every answer collected so far.
    ///
    /// Calling it again after the survey ended does nothing.
    pub fn end(&mut self) -> Result<(), SurveyError> {
        if self.phase == Phase::Ended {
            return Ok(());
        }
        self.phase = Phase::Ended;
        self.current = None;

        self.view.close_modal();
        self.view.show_end(END_MESSAGE);
        if let Some(bar) = self.time_bar.take() {
            bar.destroy();
            self.view.remove_time_bar();
        }

        let body = serde_json::to_string(&self.answers)?;
        tracing::info!(
            answers = self.answers.len(),
            url = %self.config.post_url,
            "submitting answers"
        );

        let outcome = match self.submitter.submit(&self.config.post_url, &body) {
            Ok(response) if response.is_ok() => self.saved(&response),
            Ok(response) => {
                tracing::error!(
                    status = response.status,
                    body = %response.body,
                    "the answers were not saved"
                );
                self.view.open_modal(save_error_modal(&response.body));
                SubmissionOutcome::Rejected {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "could not submit the answers");
                let message = err.to_string();
                self.view.open_modal(save_error_modal(&message));
                SubmissionOutcome::Failed { message }
            }
        };
        self.outcome = Some(outcome);
        Ok(())
    }

    fn saved(&mut self, response: &SubmitResponse) -> SubmissionOutcome {
        let next_step = response.next_step();
        self.view.set_unload_guard(None);
        match &next_step {
            Some(url) => {
                tracing::info!(%url, "answers saved, moving on");
                self.view.navigate(url);
            }
            None => {
                tracing::info!("answers saved");
                self.view.mark_done();
            }
        }
        SubmissionOutcome::Saved { next_step }
    }

    fn advance(&mut self) -> Result<(), SurveyError> {
        let stride = self.config.questions.stride();
        let pair_index = self.cursor / stride;
        let Some((left, right)) = self.config.questions.images_at(self.cursor) else {
            tracing::error!(cursor = self.cursor, "advanced past the last pair");
            return Err(SurveyError::MissingPair {
                cursor: self.cursor,
            });
        };
        let (left, right) = (left.to_string(), right.to_string());
        let question = match (&self.config.questions, &self.generator) {
            (QuestionSource::Pairs { pair_questions }, _) => pair_questions
                .get(self.cursor)
                .map(|pair| GeneratedQuestion::fixed(pair.text.clone()))
                .unwrap_or_default(),
            (QuestionSource::Template { .. }, Some(generator)) => {
                generator.generate_question(&mut self.random)
            }
            (QuestionSource::Template { .. }, None) => GeneratedQuestion::default(),
        };
        self.cursor += stride;

        self.phase = Phase::AwaitingImages;
        self.view.clear_images();
        self.view.set_loading(true);

        let left_url = self.config.image_url(&left, pair_index, true);
        let right_url = self.config.image_url(&right, pair_index, false);
        tracing::debug!(pair = pair_index, %left_url, %right_url, "loading images");

        match self.loader.load_pair(&left_url, &right_url) {
            Ok((left_image, right_image)) => {
                self.view.show_images(&left_image, &right_image);
                self.view.set_question(&question.text);
                self.question_timer.start();
                if let Some(bar) = &mut self.time_bar {
                    bar.start();
                    self.view.render_time_bar(bar.state());
                }
                if !self.survey_timer.is_initialized() {
                    self.survey_timer.start();
                }
                self.view.set_loading(false);
                self.current = Some(CurrentPair {
                    left,
                    right,
                    question,
                });
                self.phase = Phase::Presenting;
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    url = err.url(),
                    "could not load the images of the current question"
                );
                self.view.open_modal(image_error_modal());
            }
        }
        Ok(())
    }
}

fn image_error_modal() -> Modal<SurveyAction> {
    Modal::new(
        IMAGE_ERROR_TITLE,
        IMAGE_ERROR_BODY,
        vec![
            ActionButton::new("Exit survey", SurveyAction::ExitSurvey),
            ActionButton::new("Submit", SurveyAction::Submit),
        ],
    )
}

fn save_error_modal(error_text: &str) -> Modal<SurveyAction> {
    Modal::new(
        SAVE_ERROR_TITLE,
        format!(
            "There was an unexpected error while saving your survey results: <br><br><b style='font-size:13px'>\"{error_text}\"</b><br><br>Please try taking the survey again in a few moments."
        ),
        vec![ActionButton::new("Exit survey", SurveyAction::ExitSurvey)],
    )
}

#[cfg(test)]
mod tests {
    use percept_types::PairQuestion;

    use super::*;
    use crate::{RecordingView, StubLoader, StubSubmitter};

    #[test]
    fn image_error_offers_exit_and_submit() {
        let modal = image_error_modal();
        assert_eq!(modal.title(), "Image loading error");
        assert_eq!(modal.labels(), ["Exit survey", "Submit"]);
        assert_eq!(modal.press(1), Some(&SurveyAction::Submit));
    }

    #[test]
    fn advancing_past_the_last_pair_is_an_error() {
        let config = SurveyConfig::new(
            QuestionSource::Pairs {
                pair_questions: vec![PairQuestion {
                    images: ("l.jpg".into(), "r.jpg".into()),
                    text: "Who smiles more?".into(),
                }],
            },
            "/post-survey",
        );
        let mut survey = Survey::builder(
            config,
            RecordingView::new(),
            StubLoader::new(),
            StubSubmitter::new(200, "{}"),
        )
        .start()
        .unwrap();
        assert_eq!(survey.cursor(), 1);

        let err = survey.advance().unwrap_err();
        assert!(matches!(err, SurveyError::MissingPair { cursor: 1 }));
        assert_eq!(survey.cursor(), 1);
        assert_eq!(survey.phase(), Phase::Presenting);
    }

    #[test]
    fn save_error_quotes_server_text() {
        let modal = save_error_modal("db error");
        assert!(modal.body().contains("\"db error\""));
        assert_eq!(modal.labels(), ["Exit survey"]);
    }
}

//! Test backend for driving surveys without a frontend or network.
//!
//! `RecordingView` remembers everything the survey asked it to show,
//! `StubLoader` serves placeholder images (or fails on request) and
//! `StubSubmitter` answers submissions with canned responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use percept::{Choice, RecordingView, StubLoader, StubSubmitter, Survey};
//!
//! let mut survey = Survey::builder(
//!     config,
//!     RecordingView::new(),
//!     StubLoader::new(),
//!     StubSubmitter::new(200, "{}"),
//! )
//! .start()?;
//!
//! survey.choose(Choice::Left)?;
//! assert!(survey.view().done);
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::{
    ImageLoadError, ImageLoader, LoadedImage, Modal, SubmitError, SubmitResponse, Submitter,
    SurveyAction, SurveyView, TimeBarState,
};

/// A view that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingView {
    /// Current question text.
    pub question: Option<String>,

    /// URLs of the pair currently shown; `None` while the slots are blank.
    pub images: Option<(String, String)>,

    /// Every pair revealed so far, in order.
    pub shown_pairs: Vec<(String, String)>,

    pub loading: bool,

    /// Last rendered time bar state, `None` before the first render or once removed.
    pub time_bar: Option<TimeBarState>,
    pub time_bar_removed: bool,

    /// Open modals, oldest first.
    pub modals: Vec<Modal<SurveyAction>>,

    /// Every modal ever opened, in order.
    pub opened_modals: usize,

    pub end_message: Option<String>,
    pub done: bool,
    pub navigated_to: Option<String>,
    pub unload_guard: Option<String>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently opened modal that is still open.
    pub fn top_modal(&self) -> Option<&Modal<SurveyAction>> {
        self.modals.last()
    }
}

impl SurveyView for RecordingView {
    fn set_question(&mut self, text: &str) {
        self.question = Some(text.to_string());
    }

    fn clear_images(&mut self) {
        self.images = None;
    }

    fn show_images(&mut self, left: &LoadedImage, right: &LoadedImage) {
        let pair = (left.url.clone(), right.url.clone());
        self.shown_pairs.push(pair.clone());
        self.images = Some(pair);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn render_time_bar(&mut self, state: &TimeBarState) {
        self.time_bar = Some(state.clone());
    }

    fn remove_time_bar(&mut self) {
        self.time_bar = None;
        self.time_bar_removed = true;
    }

    fn open_modal(&mut self, modal: Modal<SurveyAction>) {
        self.opened_modals += 1;
        self.modals.push(modal);
    }

    fn close_modal(&mut self) {
        if !self.modals.is_empty() {
            self.modals.remove(0);
        }
    }

    fn show_end(&mut self, message: &str) {
        self.question = Some(message.to_string());
        self.images = None;
        self.end_message = Some(message.to_string());
    }

    fn mark_done(&mut self) {
        self.done = true;
    }

    fn navigate(&mut self, url: &str) {
        self.navigated_to = Some(url.to_string());
    }

    fn set_unload_guard(&mut self, message: Option<&str>) {
        self.unload_guard = message.map(str::to_string);
    }
}

/// An image loader that succeeds instantly unless told to fail.
#[derive(Debug, Default)]
pub struct StubLoader {
    failing: HashSet<String>,
    fail_all: bool,
    requested: Mutex<Vec<String>>,
}

impl StubLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 404 for `url`.
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Answer 404 for every URL.
    pub fn failing_everything(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Every URL requested so far. The two loads of a pair may appear in either order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ImageLoader for StubLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if self.fail_all || self.failing.contains(url) {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: 404,
            });
        }
        Ok(LoadedImage {
            url: url.to_string(),
            bytes: Vec::new(),
            width: 1,
            height: 1,
        })
    }
}

/// A submitter that replays canned responses.
///
/// Responses are used in order; the last one repeats.
#[derive(Debug)]
pub struct StubSubmitter {
    responses: Mutex<VecDeque<Result<SubmitResponse, String>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl StubSubmitter {
    /// Answer every submission with `status` and `body`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self::from_queue(Ok(SubmitResponse::new(status, body)))
    }

    /// Fail every submission without a response.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::from_queue(Err(message.into()))
    }

    /// Queue another response after the current ones.
    pub fn then(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(SubmitResponse::new(status, body)));
        self
    }

    fn from_queue(first: Result<SubmitResponse, String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([first])),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every `(url, body)` submitted so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Submitter for StubSubmitter {
    fn submit(&self, url: &str, body: &str) -> Result<SubmitResponse, SubmitError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), body.to_string()));

        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        let next = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(SubmitError::transport(anyhow::anyhow!(message))),
            None => Err(SubmitError::transport(anyhow::anyhow!("no canned response"))),
        }
    }
}

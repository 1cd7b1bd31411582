use crate::{ImageLoadError, Modal, SubmitError, SurveyAction, TimeBarState};

/// An image that was fetched and verified to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// The URL the image was fetched from.
    pub url: String,

    /// Raw encoded bytes.
    pub bytes: Vec<u8>,

    pub width: u32,
    pub height: u32,
}

/// Trait for the presentation side of a pairwise survey.
///
/// The survey controller owns its view and drives it through these calls.
/// Implementations only render; they never decide flow.
pub trait SurveyView {
    /// Replace the question text. May contain `<b>` emphasis.
    fn set_question(&mut self, text: &str);

    /// Blank both image slots.
    fn clear_images(&mut self);

    /// Reveal a loaded pair.
    fn show_images(&mut self, left: &LoadedImage, right: &LoadedImage);

    /// Mark both options as loading (not clickable) or ready.
    fn set_loading(&mut self, loading: bool);

    /// Draw the current time bar state.
    fn render_time_bar(&mut self, state: &TimeBarState);

    /// Detach the time bar widget.
    fn remove_time_bar(&mut self);

    /// Attach a modal on top of everything else.
    fn open_modal(&mut self, modal: Modal<SurveyAction>);

    /// Remove the oldest open modal, if any.
    fn close_modal(&mut self);

    /// Replace the question area with a terminal message and detach the options.
    fn show_end(&mut self, message: &str);

    /// The survey finished and nothing follows.
    fn mark_done(&mut self);

    /// Leave the survey for another page.
    fn navigate(&mut self, url: &str);

    /// Arm (`Some(message)`) or disarm (`None`) the leave confirmation.
    fn set_unload_guard(&mut self, message: Option<&str>);
}

/// Trait for fetching survey images.
///
/// Loaders are shared between the two concurrent fetches of a pair, hence `Sync`.
pub trait ImageLoader: Sync {
    /// Fetch and verify one image.
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError>;

    /// Fetch both images of a pair concurrently.
    ///
    /// Waits for both fetches before reporting; fails if either failed.
    fn load_pair(
        &self,
        left: &str,
        right: &str,
    ) -> Result<(LoadedImage, LoadedImage), ImageLoadError> {
        let (left, right) = std::thread::scope(|scope| {
            let right_fetch = scope.spawn(|| self.load(right));
            let left = self.load(left);
            let right = right_fetch.join().unwrap_or_else(|_| {
                Err(ImageLoadError::Transport {
                    url: right.to_string(),
                    source: anyhow::anyhow!("image fetch panicked"),
                })
            });
            (left, right)
        });
        Ok((left?, right?))
    }
}

/// The status and body of a submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

impl SubmitResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only a plain 200 counts as a successful save.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Any 2xx status; regular forms count these as saved.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `next_step` URL of a successful response, if the body carries one.
    pub fn next_step(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value
            .get("next_step")?
            .as_str()
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// Trait for posting JSON payloads to the backend.
pub trait Submitter {
    /// POST `body` (a JSON document) to `url`.
    ///
    /// Every HTTP response, whatever its status, is `Ok`.
    fn submit(&self, url: &str, body: &str) -> Result<SubmitResponse, SubmitError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Fixed {
        failing: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl ImageLoader for Fixed {
        fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError> {
            self.seen.lock().unwrap().push(url.to_string());
            if url == self.failing {
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

    #[test]
    fn load_pair_waits_for_both() {
        let loader = Fixed {
            failing: "a",
            seen: Mutex::new(Vec::new()),
        };
        let err = loader.load_pair("a", "b").unwrap_err();
        assert_eq!(err.url(), "a");

        let mut seen = loader.seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, ["a", "b"]);
    }

    #[test]
    fn load_pair_keeps_sides() {
        let loader = Fixed {
            failing: "",
            seen: Mutex::new(Vec::new()),
        };
        let (left, right) = loader.load_pair("l", "r").unwrap();
        assert_eq!(left.url, "l");
        assert_eq!(right.url, "r");
    }

    #[test]
    fn next_step_is_optional() {
        assert_eq!(
            SubmitResponse::new(200, r#"{"next_step": "/survey/form"}"#).next_step(),
            Some("/survey/form".to_string())
        );
        assert_eq!(SubmitResponse::new(200, "{}").next_step(), None);
        assert_eq!(SubmitResponse::new(200, "").next_step(), None);
        assert!(!SubmitResponse::new(201, "").is_ok());
        assert!(SubmitResponse::new(201, "").is_success());
        assert!(!SubmitResponse::new(302, "").is_success());
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which of the two presented images the respondent picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// The first (left) image, option 0.
    Left,
    /// The second (right) image, option 1.
    Right,
}

impl Choice {
    /// Map an option index (0 or 1) to a choice.
    pub fn from_option(option: usize) -> Option<Self> {
        match option {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }

    /// The option index of this choice.
    pub fn option(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// One image of an answered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerImage {
    pub image: String,
    pub chosen: bool,
}

/// The record of one answered pair question.
///
/// This is the wire contract of the final submission: the survey posts a
/// JSON array of these.
///
/// ```json
/// {
///     "images": [{"image": "a.jpg", "chosen": true}, {"image": "b.jpg", "chosen": false}],
///     "seconds_taken": 1.42,
///     "question_variables": {"job": "a pilot"},
///     "time_bar_enabled": true,
///     "user_id": "5f0c…"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Left and right image; exactly one is chosen.
    pub images: [AnswerImage; 2],

    /// Seconds from reveal to click on the question timer.
    pub seconds_taken: f64,

    /// Placeholder values of the generated question that was shown.
    pub question_variables: BTreeMap<String, String>,

    /// Whether a per-question time bar was displayed.
    pub time_bar_enabled: bool,

    /// Opaque respondent identifier.
    pub user_id: String,
}

impl Answer {
    /// Build the record for a pair and the respondent's choice.
    pub fn new(
        left: impl Into<String>,
        right: impl Into<String>,
        choice: Choice,
        seconds_taken: f64,
    ) -> Self {
        Self {
            images: [
                AnswerImage {
                    image: left.into(),
                    chosen: choice == Choice::Left,
                },
                AnswerImage {
                    image: right.into(),
                    chosen: choice == Choice::Right,
                },
            ],
            seconds_taken,
            question_variables: BTreeMap::new(),
            time_bar_enabled: false,
            user_id: String::new(),
        }
    }

    /// Attach the generated question's variable bindings.
    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.question_variables = variables;
        self
    }

    /// Record whether a time bar was shown.
    pub fn with_time_bar(mut self, enabled: bool) -> Self {
        self.time_bar_enabled = enabled;
        self
    }

    /// Attach the respondent identifier.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// The image that was picked.
    pub fn chosen_image(&self) -> &str {
        if self.images[0].chosen {
            &self.images[0].image
        } else {
            &self.images[1].image
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_image_is_chosen() {
        for choice in [Choice::Left, Choice::Right] {
            let answer = Answer::new("a", "b", choice, 0.5);
            let chosen = answer.images.iter().filter(|image| image.chosen).count();
            assert_eq!(chosen, 1);
        }
        assert_eq!(Answer::new("a", "b", Choice::Right, 0.5).chosen_image(), "b");
    }

    #[test]
    fn option_indices() {
        assert_eq!(Choice::from_option(0), Some(Choice::Left));
        assert_eq!(Choice::from_option(1), Some(Choice::Right));
        assert_eq!(Choice::from_option(2), None);
        assert_eq!(Choice::Right.option(), 1);
    }

    #[test]
    fn wire_shape() {
        let answer = Answer::new("a.jpg", "b.jpg", Choice::Left, 1.5)
            .with_variables(BTreeMap::from([("job".to_string(), "a pilot".to_string())]))
            .with_time_bar(true)
            .with_user_id("u1");

        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "images": [
                    {"image": "a.jpg", "chosen": true},
                    {"image": "b.jpg", "chosen": false}
                ],
                "seconds_taken": 1.5,
                "question_variables": {"job": "a pilot"},
                "time_bar_enabled": true,
                "user_id": "u1"
            })
        );
    }
}

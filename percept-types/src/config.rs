use serde::{Deserialize, Serialize};

use crate::{ConfigError, PairQuestion, QuestionTemplate, RegularQuestion};

/// Where the pair questions come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionSource {
    /// A templated question and a flat image list consumed two at a time.
    Template {
        question: QuestionTemplate,
        images: Vec<String>,
    },

    /// Pre-paired questions consumed one at a time.
    Pairs { pair_questions: Vec<PairQuestion> },
}

impl QuestionSource {
    /// How far the cursor moves per answered pair.
    pub fn stride(&self) -> usize {
        match self {
            Self::Template { .. } => 2,
            Self::Pairs { .. } => 1,
        }
    }

    /// Number of entries the cursor walks over.
    pub fn len(&self) -> usize {
        match self {
            Self::Template { images, .. } => images.len(),
            Self::Pairs { pair_questions } => pair_questions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of complete pairs. A trailing unpaired image is ignored.
    pub fn pair_count(&self) -> usize {
        self.len() / self.stride()
    }

    /// Whether a complete pair starts at `cursor`.
    pub fn has_pair_at(&self, cursor: usize) -> bool {
        cursor + self.stride() <= self.len()
    }

    /// The image identifiers of the pair starting at `cursor`.
    pub fn images_at(&self, cursor: usize) -> Option<(&str, &str)> {
        match self {
            Self::Template { images, .. } => {
                let left = images.get(cursor)?;
                let right = images.get(cursor + 1)?;
                Some((left.as_str(), right.as_str()))
            }
            Self::Pairs { pair_questions } => pair_questions
                .get(cursor)
                .map(|pair| (pair.images.0.as_str(), pair.images.1.as_str())),
        }
    }
}

/// How image identifiers are turned into fetchable URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAddressing {
    /// `{image_url_prefix}/{identifier}`
    #[default]
    Prefixed,

    /// `/img/{pair_index}/{l|r}`, served per respondent by the backend.
    Indexed,
}

fn default_exit_url() -> String {
    "/".to_string()
}

/// Configuration of a pairwise image survey, as embedded by the hosting page.
///
/// ```json
/// {
///     "question": {"format": "Who of these is {job}?", "variables": {"job": ["a nurse"]}},
///     "images": ["a.jpg", "b.jpg", "c.jpg", "d.jpg"],
///     "time_bar_duration": 6,
///     "duration_seconds": 180,
///     "image_url_prefix": "/static/dataset",
///     "post_url": "/survey/occupations/images"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(flatten)]
    pub questions: QuestionSource,

    /// Per-question time bar duration in seconds. `None` disables the bar.
    #[serde(default)]
    pub time_bar_duration: Option<u32>,

    /// Overall survey duration in seconds. Absent or negative is unlimited.
    #[serde(default)]
    pub duration_seconds: Option<i64>,

    #[serde(default)]
    pub image_url_prefix: String,

    #[serde(default)]
    pub image_addressing: ImageAddressing,

    /// Endpoint receiving the final answers.
    pub post_url: String,

    /// Where "Exit survey" navigates to.
    #[serde(default = "default_exit_url")]
    pub exit_url: String,

    /// Opaque respondent identifier copied into every answer.
    #[serde(default)]
    pub user_id: String,

    /// Same-origin protection token sent with the submission.
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl SurveyConfig {
    /// A configuration with defaults for everything but the questions and endpoint.
    pub fn new(questions: QuestionSource, post_url: impl Into<String>) -> Self {
        Self {
            questions,
            time_bar_duration: None,
            duration_seconds: None,
            image_url_prefix: String::new(),
            image_addressing: ImageAddressing::default(),
            post_url: post_url.into(),
            exit_url: default_exit_url(),
            user_id: String::new(),
            csrf_token: None,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the survey relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.pair_count() == 0 {
            return Err(ConfigError::NoPairs);
        }
        if self.time_bar_duration == Some(0) {
            return Err(ConfigError::ZeroTimeBar);
        }
        if self.post_url.trim().is_empty() {
            return Err(ConfigError::MissingPostUrl);
        }
        Ok(())
    }

    /// The overall limit in seconds, if any.
    pub fn survey_duration(&self) -> Option<f64> {
        self.duration_seconds
            .filter(|seconds| *seconds >= 0)
            .map(|seconds| seconds as f64)
    }

    /// Whether a per-question time bar is shown.
    pub fn time_bar_enabled(&self) -> bool {
        self.time_bar_duration.is_some()
    }

    /// The URL of one image of the pair at `pair_index`.
    pub fn image_url(&self, identifier: &str, pair_index: usize, left: bool) -> String {
        match self.image_addressing {
            ImageAddressing::Prefixed => format!(
                "{}/{}",
                self.image_url_prefix.trim_end_matches('/'),
                identifier
            ),
            ImageAddressing::Indexed => {
                let side = if left { "l" } else { "r" };
                format!("/img/{pair_index}/{side}")
            }
        }
    }
}

/// Configuration of a regular-question form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Survey identifier used in the submission path.
    pub survey_id: String,

    pub questions: Vec<RegularQuestion>,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl FormConfig {
    pub fn new(survey_id: impl Into<String>, questions: Vec<RegularQuestion>) -> Self {
        Self {
            survey_id: survey_id.into(),
            questions,
            csrf_token: None,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.survey_id.trim().is_empty() {
            return Err(ConfigError::MissingSurveyId);
        }
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        Ok(())
    }

    /// `/survey/{survey_id}`
    pub fn post_path(&self) -> String {
        format!("/survey/{}", self.survey_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
        "question": {"format": "Who is {job}?", "variables": {"job": ["a pilot"]}},
        "images": ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"],
        "time_bar_duration": 6,
        "duration_seconds": -1,
        "image_url_prefix": "/static/faces/",
        "post_url": "/post-survey"
    }"#;

    const PAIRS: &str = r#"{
        "pair_questions": [
            {"images": ["a.jpg", "b.jpg"], "text": "Who is a nurse?"},
            {"images": ["c.jpg", "d.jpg"], "text": "Who is a pilot?"}
        ],
        "time_bar_duration": null,
        "duration_seconds": 180,
        "image_addressing": "indexed",
        "post_url": "/survey/occupations/images",
        "user_id": "u1",
        "csrf_token": "tok"
    }"#;

    #[test]
    fn template_config() {
        let config = SurveyConfig::from_json(TEMPLATE).unwrap();
        assert!(matches!(config.questions, QuestionSource::Template { .. }));
        assert_eq!(config.questions.stride(), 2);
        assert_eq!(config.questions.pair_count(), 2);
        assert_eq!(config.survey_duration(), None);
        assert!(config.time_bar_enabled());
        assert_eq!(config.exit_url, "/");
        assert_eq!(
            config.image_url("a.jpg", 0, true),
            "/static/faces/a.jpg"
        );
    }

    #[test]
    fn trailing_image_is_not_a_pair() {
        let config = SurveyConfig::from_json(TEMPLATE).unwrap();
        assert!(config.questions.has_pair_at(2));
        assert!(!config.questions.has_pair_at(4));
        assert_eq!(config.questions.images_at(4), None);
    }

    #[test]
    fn paired_config() {
        let config = SurveyConfig::from_json(PAIRS).unwrap();
        assert_eq!(config.questions.stride(), 1);
        assert_eq!(config.questions.images_at(1), Some(("c.jpg", "d.jpg")));
        assert_eq!(config.survey_duration(), Some(180.0));
        assert!(!config.time_bar_enabled());
        assert_eq!(config.image_url("c.jpg", 1, false), "/img/1/r");
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    fn rejects_inconsistent_configs() {
        let empty = SurveyConfig::new(
            QuestionSource::Template {
                question: QuestionTemplate {
                    format: "Who?".into(),
                    variables: Default::default(),
                },
                images: vec!["only.jpg".into()],
            },
            "/post",
        );
        assert!(matches!(empty.validate(), Err(ConfigError::NoPairs)));

        let mut zero = SurveyConfig::from_json(TEMPLATE).unwrap();
        zero.time_bar_duration = Some(0);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroTimeBar)));

        let mut no_post = SurveyConfig::from_json(TEMPLATE).unwrap();
        no_post.post_url = " ".into();
        assert!(matches!(no_post.validate(), Err(ConfigError::MissingPostUrl)));

        assert!(matches!(
            SurveyConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn form_config() {
        let config = FormConfig::from_json(
            r#"{"survey_id": "occupations", "questions": [{"kind": "AgreementScale", "title": "Fine?"}]}"#,
        )
        .unwrap();
        assert_eq!(config.post_path(), "/survey/occupations");

        let empty = FormConfig::new("occupations", Vec::new());
        assert!(matches!(empty.validate(), Err(ConfigError::NoQuestions)));
    }
}

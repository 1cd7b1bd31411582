use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Number of points on matrix and agreement scales.
pub const SCALE_POINTS: usize = 5;

/// Column labels of the agreement scale, from 0 to 4.
pub const AGREEMENT_LABELS: [&str; SCALE_POINTS] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];

/// Form-level message shown while any question has an error.
pub const FORM_ERROR_SUMMARY: &str =
    "There is one or more errors. Please check your answers carefully.";

const OTHER_MIN_LEN: usize = 3;
const OTHER_MAX_LEN: usize = 20;

const MISSING_OPTION: &str = "The selected option does not exist.";
const OTHER_EMPTY: &str = "You must fill the \"other\" text field if you selected it.";

/// A question of a regular-question form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RegularQuestion {
    /// Any number of options, optionally with a free "other" entry.
    MultipleChoice {
        title: String,
        #[serde(default)]
        other_enabled: bool,
        options: Vec<String>,
    },

    /// Exactly one option, optionally with a free "other" entry.
    SingleChoice {
        title: String,
        #[serde(default)]
        other_enabled: bool,
        options: Vec<String>,
    },

    /// Several statements rated on the agreement scale.
    Matrix {
        title: String,
        #[serde(alias = "options")]
        rows: Vec<String>,
    },

    /// One statement rated on the agreement scale.
    AgreementScale { title: String },

    /// A short free-text answer. Length bounds apply when both are given.
    OpenShort {
        title: String,
        #[serde(default, alias = "min_len")]
        min_length: Option<usize>,
        #[serde(default, alias = "max_len")]
        max_length: Option<usize>,
    },
}

/// The respondent's draft input for one question, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegularResponse {
    /// `other` is `Some` exactly when the "other" box is checked.
    MultipleChoice {
        checked: BTreeSet<usize>,
        other: Option<String>,
    },

    /// `other` is `Some` exactly when the "other" radio is selected.
    SingleChoice {
        checked: Option<usize>,
        other: Option<String>,
    },

    /// One optional scale column per row.
    Matrix { rows: Vec<Option<usize>> },

    AgreementScale { checked: Option<usize> },

    OpenShort { text: String },
}

/// A validated answer in the shape the backend expects.
///
/// ```json
/// [
///     {"checkedAnswers": [0, 2], "otherAnswer": null},
///     {"checkedAnswer": null, "otherAnswer": "Sailor"},
///     {"checkedAnswers": [4, 3, 0]},
///     {"checkedAnswer": 2},
///     {"answerText": "Madrid"}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum RegularAnswer {
    MultipleChoice {
        checked_answers: Vec<usize>,
        other_answer: Option<String>,
    },
    SingleChoice {
        checked_answer: Option<usize>,
        other_answer: Option<String>,
    },
    Matrix {
        checked_answers: Vec<usize>,
    },
    AgreementScale {
        checked_answer: usize,
    },
    OpenShort {
        answer_text: String,
    },
}

impl RegularResponse {
    /// Check or uncheck a multiple-choice option.
    pub fn toggle(&mut self, option: usize) {
        if let Self::MultipleChoice { checked, .. } = self {
            if !checked.remove(&option) {
                checked.insert(option);
            }
        }
    }

    /// Select a single-choice option or agreement scale point.
    ///
    /// On a single choice this deselects "other".
    pub fn select(&mut self, option: usize) {
        match self {
            Self::SingleChoice { checked, other } => {
                *checked = Some(option);
                *other = None;
            }
            Self::AgreementScale { checked } => *checked = Some(option),
            _ => {}
        }
    }

    /// Pick a scale column for one matrix row.
    pub fn select_row(&mut self, row: usize, column: usize) {
        if let Self::Matrix { rows } = self {
            if let Some(slot) = rows.get_mut(row) {
                *slot = Some(column);
            }
        }
    }

    /// Check or uncheck the "other" entry, keeping typed text while checked.
    ///
    /// On a single choice, checking "other" deselects the numbered option.
    pub fn toggle_other(&mut self) {
        match self {
            Self::MultipleChoice { other, .. } => {
                *other = match other.take() {
                    Some(_) => None,
                    None => Some(String::new()),
                };
            }
            Self::SingleChoice { checked, other } => {
                if other.take().is_none() {
                    *other = Some(String::new());
                    *checked = None;
                }
            }
            _ => {}
        }
    }

    /// The editable text of an open answer or a checked "other" entry.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::OpenShort { text } => Some(text),
            Self::MultipleChoice { other, .. } | Self::SingleChoice { other, .. } => other.as_mut(),
            _ => None,
        }
    }
}

impl RegularQuestion {
    /// The backend's name for this question kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => "MultipleChoice",
            Self::SingleChoice { .. } => "SingleChoice",
            Self::Matrix { .. } => "Matrix",
            Self::AgreementScale { .. } => "AgreementScale",
            Self::OpenShort { .. } => "OpenShort",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::MultipleChoice { title, .. }
            | Self::SingleChoice { title, .. }
            | Self::Matrix { title, .. }
            | Self::AgreementScale { title }
            | Self::OpenShort { title, .. } => title,
        }
    }

    /// Whether an "other" free-text entry is offered.
    pub fn other_enabled(&self) -> bool {
        match self {
            Self::MultipleChoice { other_enabled, .. } | Self::SingleChoice { other_enabled, .. } => {
                *other_enabled
            }
            _ => false,
        }
    }

    /// A draft with nothing selected or typed.
    pub fn empty_response(&self) -> RegularResponse {
        match self {
            Self::MultipleChoice { .. } => RegularResponse::MultipleChoice {
                checked: BTreeSet::new(),
                other: None,
            },
            Self::SingleChoice { .. } => RegularResponse::SingleChoice {
                checked: None,
                other: None,
            },
            Self::Matrix { rows, .. } => RegularResponse::Matrix {
                rows: vec![None; rows.len()],
            },
            Self::AgreementScale { .. } => RegularResponse::AgreementScale { checked: None },
            Self::OpenShort { .. } => RegularResponse::OpenShort {
                text: String::new(),
            },
        }
    }

    /// Validate a draft and convert it into its wire answer.
    ///
    /// The error is the message shown next to the question.
    pub fn validate(&self, response: &RegularResponse) -> Result<RegularAnswer, String> {
        match (self, response) {
            (
                Self::MultipleChoice {
                    other_enabled,
                    options,
                    ..
                },
                RegularResponse::MultipleChoice { checked, other },
            ) => {
                if checked.is_empty() && other.is_none() {
                    return Err("You must check at least one option.".into());
                }
                if checked.iter().any(|index| *index >= options.len())
                    || (other.is_some() && !other_enabled)
                {
                    return Err(MISSING_OPTION.into());
                }
                let other_answer = other.as_deref().map(validate_other).transpose()?;
                Ok(RegularAnswer::MultipleChoice {
                    checked_answers: checked.iter().copied().collect(),
                    other_answer,
                })
            }

            (
                Self::SingleChoice {
                    other_enabled,
                    options,
                    ..
                },
                RegularResponse::SingleChoice { checked, other },
            ) => match (checked, other) {
                (_, Some(_)) if !other_enabled => Err(MISSING_OPTION.into()),
                (_, Some(text)) => Ok(RegularAnswer::SingleChoice {
                    checked_answer: None,
                    other_answer: Some(validate_other(text)?),
                }),
                (Some(index), None) if *index >= options.len() => Err(MISSING_OPTION.into()),
                (Some(index), None) => Ok(RegularAnswer::SingleChoice {
                    checked_answer: Some(*index),
                    other_answer: None,
                }),
                (None, None) => Err("You must check one option.".into()),
            },

            (Self::Matrix { rows, .. }, RegularResponse::Matrix { rows: answers }) => {
                if answers.len() != rows.len() || answers.iter().any(Option::is_none) {
                    return Err("You must answer all rows.".into());
                }
                let checked_answers: Vec<usize> = answers.iter().flatten().copied().collect();
                if checked_answers.iter().any(|column| *column >= SCALE_POINTS) {
                    return Err(MISSING_OPTION.into());
                }
                Ok(RegularAnswer::Matrix { checked_answers })
            }

            (Self::AgreementScale { .. }, RegularResponse::AgreementScale { checked }) => {
                match checked {
                    None => Err("You must choose one option.".into()),
                    Some(index) if *index >= SCALE_POINTS => Err(MISSING_OPTION.into()),
                    Some(index) => Ok(RegularAnswer::AgreementScale {
                        checked_answer: *index,
                    }),
                }
            }

            (
                Self::OpenShort {
                    min_length,
                    max_length,
                    ..
                },
                RegularResponse::OpenShort { text },
            ) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err("You must answer this question.".into());
                }
                if let (Some(min), Some(max)) = (min_length, max_length) {
                    let len = trimmed.chars().count();
                    if len < *min || len > *max {
                        return Err(format!(
                            "Your answer must be between {min}-{max} characters length."
                        ));
                    }
                }
                Ok(RegularAnswer::OpenShort {
                    answer_text: trimmed.to_string(),
                })
            }

            _ => Err(format!(
                "The answer does not match a {} question.",
                self.kind()
            )),
        }
    }
}

fn validate_other(text: &str) -> Result<String, String> {
    let len = text.trim().chars().count();
    if len == 0 {
        return Err(OTHER_EMPTY.into());
    }
    if !(OTHER_MIN_LEN..=OTHER_MAX_LEN).contains(&len) {
        return Err(format!(
            "Your \"other\" answer must be between {OTHER_MIN_LEN}-{OTHER_MAX_LEN} characters length."
        ));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiple(other_enabled: bool) -> RegularQuestion {
        RegularQuestion::MultipleChoice {
            title: "Pets".into(),
            other_enabled,
            options: vec!["Cat".into(), "Dog".into()],
        }
    }

    #[test]
    fn deserializes_tagged_questions() {
        let questions: Vec<RegularQuestion> = serde_json::from_str(
            r#"[
                {"kind": "SingleChoice", "title": "Gender", "other_enabled": true, "options": ["Man", "Woman"]},
                {"kind": "Matrix", "title": "Rate", "options": ["Food", "Service"]},
                {"kind": "OpenShort", "title": "City", "min_len": 2, "max_len": 10}
            ]"#,
        )
        .unwrap();
        assert_eq!(questions[0].kind(), "SingleChoice");
        assert!(questions[0].other_enabled());
        assert_eq!(
            questions[1].empty_response(),
            RegularResponse::Matrix {
                rows: vec![None, None]
            }
        );
        assert_eq!(questions[2].title(), "City");
    }

    #[test]
    fn multiple_choice_messages() {
        let question = multiple(true);
        assert_eq!(
            question.validate(&question.empty_response()).unwrap_err(),
            "You must check at least one option."
        );

        let other_blank = RegularResponse::MultipleChoice {
            checked: BTreeSet::new(),
            other: Some("  ".into()),
        };
        assert_eq!(
            question.validate(&other_blank).unwrap_err(),
            "You must fill the \"other\" text field if you selected it."
        );

        let out_of_range = RegularResponse::MultipleChoice {
            checked: BTreeSet::from([2]),
            other: None,
        };
        assert_eq!(
            question.validate(&out_of_range).unwrap_err(),
            "The selected option does not exist."
        );

        let valid = RegularResponse::MultipleChoice {
            checked: BTreeSet::from([1, 0]),
            other: Some("Parrot".into()),
        };
        assert_eq!(
            question.validate(&valid).unwrap(),
            RegularAnswer::MultipleChoice {
                checked_answers: vec![0, 1],
                other_answer: Some("Parrot".into()),
            }
        );
    }

    #[test]
    fn other_requires_it_to_be_enabled() {
        let question = multiple(false);
        let response = RegularResponse::MultipleChoice {
            checked: BTreeSet::new(),
            other: Some("Parrot".into()),
        };
        assert_eq!(
            question.validate(&response).unwrap_err(),
            "The selected option does not exist."
        );
    }

    #[test]
    fn other_length_is_bounded() {
        let question = multiple(true);
        let response = RegularResponse::MultipleChoice {
            checked: BTreeSet::new(),
            other: Some("ab".into()),
        };
        assert_eq!(
            question.validate(&response).unwrap_err(),
            "Your \"other\" answer must be between 3-20 characters length."
        );
    }

    #[test]
    fn single_choice_messages() {
        let question = RegularQuestion::SingleChoice {
            title: "Gender".into(),
            other_enabled: true,
            options: vec!["Man".into(), "Woman".into()],
        };
        assert_eq!(
            question.validate(&question.empty_response()).unwrap_err(),
            "You must check one option."
        );
        assert_eq!(
            question
                .validate(&RegularResponse::SingleChoice {
                    checked: Some(1),
                    other: None
                })
                .unwrap(),
            RegularAnswer::SingleChoice {
                checked_answer: Some(1),
                other_answer: None
            }
        );
        assert_eq!(
            question
                .validate(&RegularResponse::SingleChoice {
                    checked: None,
                    other: Some("".into())
                })
                .unwrap_err(),
            "You must fill the \"other\" text field if you selected it."
        );
    }

    #[test]
    fn matrix_needs_every_row() {
        let question = RegularQuestion::Matrix {
            title: "Rate".into(),
            rows: vec!["Food".into(), "Service".into()],
        };
        let partial = RegularResponse::Matrix {
            rows: vec![Some(4), None],
        };
        assert_eq!(
            question.validate(&partial).unwrap_err(),
            "You must answer all rows."
        );
        let full = RegularResponse::Matrix {
            rows: vec![Some(4), Some(0)],
        };
        assert_eq!(
            question.validate(&full).unwrap(),
            RegularAnswer::Matrix {
                checked_answers: vec![4, 0]
            }
        );
    }

    #[test]
    fn agreement_scale_range() {
        let question = RegularQuestion::AgreementScale {
            title: "I like it".into(),
        };
        assert_eq!(
            question.validate(&question.empty_response()).unwrap_err(),
            "You must choose one option."
        );
        assert_eq!(
            question
                .validate(&RegularResponse::AgreementScale { checked: Some(5) })
                .unwrap_err(),
            "The selected option does not exist."
        );
        assert_eq!(AGREEMENT_LABELS[4], "Strongly agree");
    }

    #[test]
    fn open_short_bounds() {
        let question = RegularQuestion::OpenShort {
            title: "City".into(),
            min_length: Some(3),
            max_length: Some(6),
        };
        let answer = |text: &str| {
            question.validate(&RegularResponse::OpenShort { text: text.into() })
        };
        assert_eq!(answer("   ").unwrap_err(), "You must answer this question.");
        assert_eq!(
            answer("Barcelona").unwrap_err(),
            "Your answer must be between 3-6 characters length."
        );
        assert_eq!(
            answer(" Lugo ").unwrap(),
            RegularAnswer::OpenShort {
                answer_text: "Lugo".into()
            }
        );
    }

    #[test]
    fn editing_drafts() {
        let mut single = RegularResponse::SingleChoice {
            checked: Some(0),
            other: None,
        };
        single.toggle_other();
        single.text_mut().unwrap().push_str("Sailor");
        assert_eq!(
            single,
            RegularResponse::SingleChoice {
                checked: None,
                other: Some("Sailor".into())
            }
        );
        single.select(1);
        assert_eq!(single.text_mut(), None);

        let mut multiple = multiple(true).empty_response();
        multiple.toggle(1);
        multiple.toggle(0);
        multiple.toggle(1);
        assert_eq!(
            multiple,
            RegularResponse::MultipleChoice {
                checked: BTreeSet::from([0]),
                other: None
            }
        );

        let mut matrix = RegularResponse::Matrix {
            rows: vec![None, None],
        };
        matrix.select_row(1, 3);
        matrix.select_row(5, 3);
        assert_eq!(
            matrix,
            RegularResponse::Matrix {
                rows: vec![None, Some(3)]
            }
        );
    }

    #[test]
    fn mismatched_response_is_rejected() {
        let question = multiple(true);
        let err = question
            .validate(&RegularResponse::OpenShort { text: "x".into() })
            .unwrap_err();
        assert_eq!(err, "The answer does not match a MultipleChoice question.");
    }

    #[test]
    fn wire_shapes() {
        let answers = vec![
            RegularAnswer::MultipleChoice {
                checked_answers: vec![0, 2],
                other_answer: None,
            },
            RegularAnswer::SingleChoice {
                checked_answer: None,
                other_answer: Some("Sailor".into()),
            },
            RegularAnswer::AgreementScale { checked_answer: 2 },
            RegularAnswer::OpenShort {
                answer_text: "Madrid".into(),
            },
        ];
        assert_eq!(
            serde_json::to_value(&answers).unwrap(),
            serde_json::json!([
                {"checkedAnswers": [0, 2], "otherAnswer": null},
                {"checkedAnswer": null, "otherAnswer": "Sailor"},
                {"checkedAnswer": 2},
                {"answerText": "Madrid"}
            ])
        );
    }
}

//! The occupations study.

use percept::{
    FormConfig, PairQuestion, QuestionSource, QuestionTemplate, RegularQuestion, SurveyConfig,
};
use rand::Rng;
use rand::seq::SliceRandom;

pub const SURVEY_ID: &str = "occupations";

/// Jobs asked about, each for one eighth of the pairs.
pub const OCCUPATIONS: [&str; 8] = [
    "a Chief Executive Officer (CEO)",
    "a Computer Programmer",
    "a Doctor",
    "a Nurse",
    "a Primary School Teacher",
    "a Police Officer",
    "a Housekeeper",
    "a Construction Worker",
];

/// Ethnicity and gender codes of the face dataset groups.
const ETHNICITIES: [char; 4] = ['A', 'B', 'W', 'L'];
const GENDERS: [char; 2] = ['M', 'F'];

/// Portraits available per group in the demo dataset.
const PORTRAITS_PER_GROUP: usize = 12;

/// Pairs shown a second time with sides swapped, as attention checks.
const ATTENTION_CHECKS: usize = 6;

const DURATION_SECONDS: i64 = 180;
const TIME_BAR_SECONDS: u32 = 6;

/// When the per-question time bar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerTimer {
    Never,
    Always,
    /// Decided by a coin flip once per respondent.
    Random,
}

impl AnswerTimer {
    pub fn should_use<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Random => rng.gen_bool(0.5),
        }
    }
}

fn groups() -> Vec<String> {
    ETHNICITIES
        .iter()
        .flat_map(|ethnicity| GENDERS.iter().map(move |gender| format!("{ethnicity}{gender}")))
        .collect()
}

fn portrait<R: Rng + ?Sized>(group: &str, rng: &mut R) -> String {
    let number = rng.gen_range(1..=PORTRAITS_PER_GROUP);
    format!("CFD-{group}-{number:03}-N.jpg")
}

/// Build the pre-paired occupations survey.
///
/// Every ordered combination of the eight groups yields one pair with a
/// random portrait from each group. The 64 pairs are shuffled and each job
/// is asked eight times. A few pairs are repeated flipped, then everything
/// is shuffled again.
pub fn occupations_survey<R: Rng + ?Sized>(rng: &mut R, timer: AnswerTimer) -> SurveyConfig {
    let groups = groups();
    let mut pairs: Vec<(String, String)> = groups
        .iter()
        .flat_map(|first| groups.iter().map(move |second| (first, second)))
        .map(|(first, second)| (portrait(first, rng), portrait(second, rng)))
        .collect();
    pairs.shuffle(rng);

    let jobs = OCCUPATIONS
        .iter()
        .flat_map(|job| std::iter::repeat_n(*job, groups.len()));
    let mut questions: Vec<PairQuestion> = pairs
        .into_iter()
        .zip(jobs)
        .map(|(images, job)| PairQuestion {
            images,
            text: format!("Who of these is {job}?"),
        })
        .collect();

    let checks: Vec<PairQuestion> = questions
        .choose_multiple(rng, ATTENTION_CHECKS)
        .map(|question| PairQuestion {
            images: (question.images.1.clone(), question.images.0.clone()),
            text: question.text.clone(),
        })
        .collect();
    questions.extend(checks);
    questions.shuffle(rng);

    let mut config = SurveyConfig::new(
        QuestionSource::Pairs {
            pair_questions: questions,
        },
        "/post-survey",
    );
    config.time_bar_duration = timer.should_use(rng).then_some(TIME_BAR_SECONDS);
    config.duration_seconds = Some(DURATION_SECONDS);
    config.image_url_prefix = "/static/cfd".to_string();
    config.exit_url = "/".to_string();
    config.user_id = format!("demo-{:08x}", rng.r#gen::<u32>());
    config
}

/// The same study as a template survey over a flat portrait list.
pub fn occupations_template_survey<R: Rng + ?Sized>(rng: &mut R) -> SurveyConfig {
    let images = groups()
        .iter()
        .flat_map(|group| [portrait(group, rng), portrait(group, rng)])
        .collect::<Vec<_>>();
    let question = QuestionTemplate {
        format: "Who of these is {job}?".to_string(),
        variables: [(
            "job".to_string(),
            OCCUPATIONS.iter().map(|job| job.to_string()).collect(),
        )]
        .into_iter()
        .collect(),
    };

    let mut config = SurveyConfig::new(
        QuestionSource::Template { question, images },
        "/post-survey",
    );
    config.time_bar_duration = Some(TIME_BAR_SECONDS);
    config.image_url_prefix = "/static/cfd".to_string();
    config
}

/// The questionnaire that follows the image survey.
pub fn occupations_form() -> FormConfig {
    let agreement = |title: &str| RegularQuestion::AgreementScale {
        title: title.to_string(),
    };
    let strings = |items: &[&str]| -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    };

    FormConfig::new(
        SURVEY_ID,
        vec![
            RegularQuestion::MultipleChoice {
                title: "Which of the following best describes your primary occupational status?"
                    .into(),
                other_enabled: true,
                options: strings(&[
                    "Employed (full-time)",
                    "Employed (part-time)",
                    "Self-employed",
                    "Unemployed",
                    "Retired",
                    "Student",
                ]),
            },
            RegularQuestion::Matrix {
                title: "How familiar are you with each of the following occupations? \
                        (1 = Not at all familiar; 5 = Extremely familiar)"
                    .into(),
                rows: strings(&["Teacher", "Doctor", "Plumber"]),
            },
            RegularQuestion::SingleChoice {
                title: "How often do you watch shows, movies or news that depict occupations?"
                    .into(),
                other_enabled: false,
                options: strings(&[
                    "Never",
                    "Rarely (less than once a week)",
                    "Sometimes (1-3 times a week)",
                    "Often (4-6 times a week)",
                    "Very often (daily)",
                ]),
            },
            agreement("Media portrayals generally provide realistic depictions of occupations."),
            agreement("I notice stereotypes about certain jobs when I watch TV shows or movies."),
            agreement("It is easy to guess someone's occupation just by looking at them."),
            agreement("Even if I notice stereotypes, I try not to let them influence my judgment."),
            RegularQuestion::OpenShort {
                title: "How do you think stereotypes about occupations develop in society?".into(),
                min_length: Some(8),
                max_length: Some(50),
            },
        ],
    )
}

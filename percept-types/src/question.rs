use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::RandomSource;

/// Matches `{name}` placeholders; the name is any run of non-`}` characters.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"));

/// A question template as embedded in the page configuration.
///
/// ```json
/// {
///     "format": "Who of these is {job} and has a {vehicle}?",
///     "variables": {
///         "job": ["an engineer", "an astronaut", "a social worker"],
///         "vehicle": ["motorbike", "car", "bicycle"]
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    /// Question text with `{name}` placeholders.
    pub format: String,

    /// Candidate values per placeholder name.
    #[serde(default)]
    pub variables: BTreeMap<String, Vec<String>>,
}

/// A pre-built pair question: two images and the text shown above them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairQuestion {
    /// Left and right image identifiers.
    pub images: (String, String),

    /// The question text.
    pub text: String,
}

/// The result of one [`QuestionGenerator::generate_question`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedQuestion {
    /// Display text, each substituted value wrapped in `<b>…</b>`.
    pub text: String,

    /// The value drawn for every resolved placeholder.
    pub variables: BTreeMap<String, String>,
}

impl GeneratedQuestion {
    /// A question with fixed text and no variables.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            variables: BTreeMap::new(),
        }
    }
}

/// Produces question strings with randomly chosen placeholder values.
///
/// Placeholders are replaced by name: a placeholder that appears twice gets
/// the same drawn value in both places. Placeholders without candidates stay
/// in the text literally and are reported through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGenerator {
    template: QuestionTemplate,
    placeholders: Vec<String>,
}

impl QuestionGenerator {
    /// Create a generator from a format string and its candidate map.
    pub fn new(
        format: impl Into<String>,
        variables: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> Self {
        Self::from_template(QuestionTemplate {
            format: format.into(),
            variables: variables.into_iter().collect(),
        })
    }

    /// Create a generator from a deserialized template.
    pub fn from_template(template: QuestionTemplate) -> Self {
        let mut placeholders: Vec<String> = Vec::new();
        for captures in PLACEHOLDER.captures_iter(&template.format) {
            let name = &captures[1];
            if !placeholders.iter().any(|known| known == name) {
                placeholders.push(name.to_string());
            }
        }

        let generator = Self {
            template,
            placeholders,
        };
        for missing in generator.missing_variables() {
            tracing::warn!(
                placeholder = missing,
                "the variable map has no candidates for placeholder \"{missing}\""
            );
        }
        generator
    }

    /// The template this generator was built from.
    pub fn template(&self) -> &QuestionTemplate {
        &self.template
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Placeholder names that have no (or an empty) candidate list.
    pub fn missing_variables(&self) -> Vec<&str> {
        self.placeholders
            .iter()
            .filter(|name| self.candidates(name).is_none())
            .map(String::as_str)
            .collect()
    }

    fn candidates(&self, name: &str) -> Option<&[String]> {
        self.template
            .variables
            .get(name)
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    /// Draw one value per placeholder and build the display text.
    pub fn generate_question<R>(&self, random: &mut R) -> GeneratedQuestion
    where
        R: RandomSource + ?Sized,
    {
        let mut variables = BTreeMap::new();
        for name in &self.placeholders {
            match self.candidates(name) {
                Some(values) => {
                    let value = &values[random.pick(values.len())];
                    variables.insert(name.clone(), value.clone());
                }
                None => {
                    tracing::warn!(
                        placeholder = name.as_str(),
                        "the variable map does not contain the key \"{name}\""
                    );
                }
            }
        }

        let text = PLACEHOLDER
            .replace_all(&self.template.format, |captures: &Captures<'_>| {
                match variables.get(&captures[1]) {
                    Some(value) => format!("<b>{value}</b>"),
                    None => captures[0].to_string(),
                }
            })
            .into_owned();

        GeneratedQuestion { text, variables }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::ScriptedPicks;

    struct Chacha(ChaCha8Rng);

    impl RandomSource for Chacha {
        fn pick(&mut self, len: usize) -> usize {
            use rand::Rng;
            self.0.gen_range(0..len)
        }
    }

    fn jobs() -> QuestionGenerator {
        QuestionGenerator::new(
            "Who is {job}?",
            [(
                "job".to_string(),
                vec!["engineer".to_string(), "pilot".to_string()],
            )],
        )
    }

    #[test]
    fn substitutes_with_emphasis() {
        let generator = jobs();
        let mut random = Chacha(ChaCha8Rng::seed_from_u64(42));
        for _ in 0..50 {
            let question = generator.generate_question(&mut random);
            let job = &question.variables["job"];
            assert!(job == "engineer" || job == "pilot");
            assert_eq!(question.text, format!("Who is <b>{job}</b>?"));
        }
    }

    #[test]
    fn scripted_picks_select_candidates() {
        let generator = jobs();
        let mut random = ScriptedPicks::new([1, 0]);
        assert_eq!(
            generator.generate_question(&mut random).text,
            "Who is <b>pilot</b>?"
        );
        assert_eq!(
            generator.generate_question(&mut random).text,
            "Who is <b>engineer</b>?"
        );
    }

    #[test]
    fn repeated_placeholder_gets_one_value() {
        let generator = QuestionGenerator::new(
            "{job} meets {job}",
            [(
                "job".to_string(),
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
            )],
        );
        assert_eq!(generator.placeholders(), ["job"]);

        let mut random = ScriptedPicks::new([2, 0]);
        let question = generator.generate_question(&mut random);
        assert_eq!(question.text, "<b>c</b> meets <b>c</b>");
        assert_eq!(question.variables.len(), 1);
    }

    #[test]
    fn independent_placeholders_draw_in_order() {
        let generator = QuestionGenerator::new(
            "Who is {job} and drives a {vehicle}?",
            [
                ("job".to_string(), vec!["a nurse".into(), "a pilot".into()]),
                ("vehicle".to_string(), vec!["car".into(), "bike".into()]),
            ],
        );
        let mut random = ScriptedPicks::new([1, 0]);
        let question = generator.generate_question(&mut random);
        assert_eq!(
            question.text,
            "Who is <b>a pilot</b> and drives a <b>car</b>?"
        );
        assert_eq!(question.variables["job"], "a pilot");
        assert_eq!(question.variables["vehicle"], "car");
    }

    #[test]
    fn unknown_placeholder_stays_literal() {
        let generator = QuestionGenerator::new(
            "Who is {job} from {city}?",
            [
                ("job".to_string(), vec!["a baker".into()]),
                ("city".to_string(), Vec::new()),
            ],
        );
        assert_eq!(generator.missing_variables(), ["city"]);

        let question = generator.generate_question(&mut ScriptedPicks::default());
        assert_eq!(question.text, "Who is <b>a baker</b> from {city}?");
        assert!(!question.variables.contains_key("city"));
    }

    #[test]
    fn template_without_placeholders() {
        let generator = QuestionGenerator::new("Who smiles more?", []);
        let question = generator.generate_question(&mut ScriptedPicks::default());
        assert_eq!(question, GeneratedQuestion::fixed("Who smiles more?"));
    }

    #[test]
    fn values_are_not_substituted_twice() {
        let generator = QuestionGenerator::new(
            "{a} and {b}",
            [
                ("a".to_string(), vec!["{b}".into()]),
                ("b".to_string(), vec!["x".into()]),
            ],
        );
        let question = generator.generate_question(&mut ScriptedPicks::default());
        assert_eq!(question.text, "<b>{b}</b> and <b>x</b>");
    }
}

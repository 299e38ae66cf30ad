//! Typed results of the structured study operations.

use learnsphere_core::GeneratedImage;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A multiple-choice question.
///
/// # Examples
///
/// ```
/// use learnsphere::QuizQuestion;
///
/// let json = r#"{"question":"2 + 2?","options":["3","4"],"correctAnswer":"4"}"#;
/// let question: QuizQuestion = serde_json::from_str(json).unwrap();
/// assert!(question.is_correct("4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The question text
    pub question: String,
    /// Answer options, one of which is correct
    pub options: Vec<String>,
    /// The correct option, verbatim
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Shown when a daily challenge cannot be generated.
    pub fn fallback_challenge() -> Self {
        Self {
            question: "Which of these is a fundamental concept in Computer Science?".to_string(),
            options: ["Photosynthesis", "Gravity", "Algorithms", "Sonnet"]
                .into_iter()
                .map(String::from)
                .collect(),
            correct_answer: "Algorithms".to_string(),
        }
    }

    /// Put the options in random order.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.options.shuffle(rng);
    }

    /// True when `answer` is the correct option.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// A study flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Key term or question
    pub front: String,
    /// Definition or answer
    pub back: String,
}

/// One day of a study plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDay {
    /// Label such as "Day 1: Monday"
    pub day: String,
    /// Main topic for the day
    pub focus: String,
    /// Concrete tasks
    pub tasks: Vec<String>,
}

/// What a study plan should be built around.
///
/// # Examples
///
/// ```
/// use learnsphere::StudyPlanParams;
///
/// let params = StudyPlanParams::builder()
///     .goal("Pass the final exam")
///     .subject("Chemistry")
///     .level("Senior Secondary")
///     .country("Nigeria")
///     .duration(5u32)
///     .build()
///     .unwrap();
/// assert_eq!(params.duration, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), build_fn(error = "learnsphere_error::BuilderError"))]
pub struct StudyPlanParams {
    /// What the student wants to achieve
    pub goal: String,
    /// Primary subject
    pub subject: String,
    /// Education level, e.g. "University"
    pub level: String,
    /// Student's country
    pub country: String,
    /// Plan length in days
    #[builder(default = "7")]
    pub duration: u32,
}

impl StudyPlanParams {
    /// Start building plan parameters.
    pub fn builder() -> StudyPlanParamsBuilder {
        StudyPlanParamsBuilder::default()
    }
}

/// A spoken-style explanation with an optional visual aid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Text to be read aloud
    pub script: String,
    /// Generated illustration, when image generation succeeded
    pub image: Option<GeneratedImage>,
}

impl Explanation {
    /// The illustration as a `data:` URL.
    pub fn image_data_url(&self) -> Option<String> {
        self.image.as_ref().map(GeneratedImage::to_data_url)
    }
}

/// Model output for an explanation, before the image exists.
#[derive(Debug, Deserialize)]
pub(crate) struct ExplanationDraft {
    #[serde(default)]
    pub(crate) script: String,
    #[serde(default)]
    pub(crate) image_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnsphere_error::BuilderErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shuffle_keeps_the_same_options() {
        let mut question = QuizQuestion::fallback_challenge();
        let mut before = question.options.clone();
        question.shuffle_options(&mut StdRng::seed_from_u64(7));

        let mut after = question.options.clone();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(question.is_correct("Algorithms"));
    }

    #[test]
    fn correct_answer_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(QuizQuestion::fallback_challenge()).unwrap();
        assert_eq!(json["correctAnswer"], "Algorithms");
        assert!(json.get("correct_answer").is_none());
    }

    #[test]
    fn plan_params_report_the_missing_field() {
        let err = StudyPlanParams::builder()
            .goal("Pass")
            .subject("Physics")
            .level("University")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), &BuilderErrorKind::MissingField("country"));
    }

    #[test]
    fn draft_tolerates_missing_fields() {
        let draft: ExplanationDraft = serde_json::from_str(r#"{"script":"Hi"}"#).unwrap();
        assert_eq!(draft.script, "Hi");
        assert!(draft.image_prompt.is_empty());
    }
}

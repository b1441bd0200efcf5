use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AssessmentError, SelectionProblem};
use super::locale::LocalizedText;

/// Identifier wrapper for catalog questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for compliance modules (licensing, data protection, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub String);

/// Business activity a user can declare, used to select relevant questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct ActivityTag(pub String);

impl ActivityTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }
}

macro_rules! display_id {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

display_id!(QuestionId, ModuleId);

impl fmt::Display for ActivityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActivityTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Answer a user gives to a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Yes,
    Partial,
    No,
    NotApplicable,
}

impl AnswerValue {
    pub const fn ordered() -> [Self; 4] {
        [Self::Yes, Self::Partial, Self::No, Self::NotApplicable]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Partial => "partial",
            Self::No => "no",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AnswerValue {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "partial" | "partially" => Ok(Self::Partial),
            "no" | "n" => Ok(Self::No),
            "not_applicable" | "n/a" | "na" => Ok(Self::NotApplicable),
            other => Err(format!(
                "unknown answer '{other}' (expected yes, partial, no, or not_applicable)"
            )),
        }
    }
}

/// Domain of answers a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    YesNo,
    YesNoNa,
    Graded,
    GradedNa,
}

impl AnswerType {
    pub fn accepts(self, value: AnswerValue) -> bool {
        match (self, value) {
            (_, AnswerValue::Yes | AnswerValue::No) => true,
            (Self::Graded | Self::GradedNa, AnswerValue::Partial) => true,
            (Self::YesNoNa | Self::GradedNa, AnswerValue::NotApplicable) => true,
            _ => false,
        }
    }

    pub fn values(self) -> Vec<AnswerValue> {
        AnswerValue::ordered()
            .into_iter()
            .filter(|value| self.accepts(*value))
            .collect()
    }
}

/// Immutable catalog question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: QuestionId,
    pub module: ModuleId,
    pub prompt: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<LocalizedText>,
    pub activities: Vec<ActivityTag>,
    pub answer_type: AnswerType,
    pub weight: u32,
}

impl AssessmentQuestion {
    pub fn applies_to(&self, selection: &SelectedActivities) -> bool {
        self.activities.iter().any(|tag| selection.contains(tag))
    }
}

/// Named compliance topic area grouping related questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceModule {
    pub id: ModuleId,
    pub title: LocalizedText,
}

/// Activity a user can pick on the selection screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub tag: ActivityTag,
    pub label: LocalizedText,
}

/// Non-empty set of activities chosen when an assessment starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectedActivities(BTreeSet<ActivityTag>);

impl SelectedActivities {
    pub fn new<I, T>(tags: I) -> Result<Self, AssessmentError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ActivityTag>,
    {
        let tags: BTreeSet<ActivityTag> = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag: &ActivityTag| !tag.0.is_empty())
            .collect();

        if tags.is_empty() {
            return Err(AssessmentError::InvalidSelection(SelectionProblem::Empty));
        }

        Ok(Self(tags))
    }

    pub fn contains(&self, tag: &ActivityTag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Qualitative bucket derived from a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    NonCompliant,
    Incomplete,
}

impl ComplianceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::AtRisk => "At Risk",
            Self::NonCompliant => "Non-Compliant",
            Self::Incomplete => "Incomplete",
        }
    }

    pub fn localized_label(self) -> LocalizedText {
        let ar = match self {
            Self::Compliant => "ملتزم",
            Self::AtRisk => "معرض للخطر",
            Self::NonCompliant => "غير ملتزم",
            Self::Incomplete => "غير مكتمل",
        };
        LocalizedText::en_ar(self.label(), ar)
    }
}

/// Recorded answer; the latest answer for a question replaces earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
    #[serde(default = "Utc::now")]
    pub answered_at: DateTime<Utc>,
}

impl AssessmentAnswer {
    pub fn new(question_id: impl Into<QuestionId>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
            answered_at: Utc::now(),
        }
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

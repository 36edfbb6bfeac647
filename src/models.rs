//! Insights and citation record shapes.

use serde::{Deserialize, Deserializer, Serialize};

/// `null` decodes the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// List decode where a `null` list or a `null` element becomes empty.
fn null_tolerant_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Structured analysis of a piece of research text.
///
/// Every field is populated after a successful analysis, either with genuine
/// content or with its [`InsightField`] placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insights {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub suggestions: Vec<String>,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub related_topics: Vec<String>,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub methodology: Vec<String>,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub gaps: Vec<String>,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub citations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub impact: String,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub limitations: Vec<String>,
    #[serde(deserialize_with = "null_tolerant_list")]
    pub future_work: Vec<String>,
    /// Filled by the research service, never by the LLM
    #[serde(skip_deserializing)]
    pub scholar_citations: Vec<ScholarRecord>,
}

/// A single citation from the scholar search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarRecord {
    pub title: String,
    pub authors: Vec<String>,
    /// 0 when unknown
    pub year: i64,
    pub journal: String,
    pub volume: String,
    pub pages: String,
    pub publisher: String,
    pub doi: String,
    pub url: String,
    pub citation_count: i64,
}

/// The nine LLM-derived fields of [`Insights`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightField {
    Summary,
    Impact,
    Suggestions,
    RelatedTopics,
    Methodology,
    Gaps,
    Citations,
    Limitations,
    FutureWork,
}

impl InsightField {
    /// All fields, in validation order.
    pub const ALL: [InsightField; 9] = [
        InsightField::Summary,
        InsightField::Impact,
        InsightField::Suggestions,
        InsightField::RelatedTopics,
        InsightField::Methodology,
        InsightField::Gaps,
        InsightField::Citations,
        InsightField::Limitations,
        InsightField::FutureWork,
    ];

    /// JSON key of the field.
    pub fn name(self) -> &'static str {
        match self {
            InsightField::Summary => "summary",
            InsightField::Impact => "impact",
            InsightField::Suggestions => "suggestions",
            InsightField::RelatedTopics => "relatedTopics",
            InsightField::Methodology => "methodology",
            InsightField::Gaps => "gaps",
            InsightField::Citations => "citations",
            InsightField::Limitations => "limitations",
            InsightField::FutureWork => "futureWork",
        }
    }

    /// Fallback text used when the field is still empty after the retry.
    pub fn placeholder(self) -> &'static str {
        match self {
            InsightField::Summary | InsightField::Impact => "Not available",
            InsightField::Suggestions => "No suggestions available",
            InsightField::RelatedTopics => "No related topics available",
            InsightField::Methodology => "No methodology available",
            InsightField::Gaps => "No gaps identified",
            InsightField::Citations => "No citations available",
            InsightField::Limitations => "No limitations identified",
            InsightField::FutureWork => "No future work suggestions available",
        }
    }
}

impl std::fmt::Display for InsightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Insights {
    fn text_mut(&mut self, field: InsightField) -> Option<&mut String> {
        match field {
            InsightField::Summary => Some(&mut self.summary),
            InsightField::Impact => Some(&mut self.impact),
            _ => None,
        }
    }

    fn list_mut(&mut self, field: InsightField) -> Option<&mut Vec<String>> {
        match field {
            InsightField::Suggestions => Some(&mut self.suggestions),
            InsightField::RelatedTopics => Some(&mut self.related_topics),
            InsightField::Methodology => Some(&mut self.methodology),
            InsightField::Gaps => Some(&mut self.gaps),
            InsightField::Citations => Some(&mut self.citations),
            InsightField::Limitations => Some(&mut self.limitations),
            InsightField::FutureWork => Some(&mut self.future_work),
            _ => None,
        }
    }

    /// Whether the given field holds no content.
    pub fn is_empty_field(&self, field: InsightField) -> bool {
        match field {
            InsightField::Summary => self.summary.is_empty(),
            InsightField::Impact => self.impact.is_empty(),
            InsightField::Suggestions => self.suggestions.is_empty(),
            InsightField::RelatedTopics => self.related_topics.is_empty(),
            InsightField::Methodology => self.methodology.is_empty(),
            InsightField::Gaps => self.gaps.is_empty(),
            InsightField::Citations => self.citations.is_empty(),
            InsightField::Limitations => self.limitations.is_empty(),
            InsightField::FutureWork => self.future_work.is_empty(),
        }
    }

    /// Every empty field, in validation order.
    pub fn missing_fields(&self) -> Vec<InsightField> {
        InsightField::ALL
            .into_iter()
            .filter(|f| self.is_empty_field(*f))
            .collect()
    }

    /// Fill every empty field with its placeholder, returning the fields filled.
    pub fn fill_placeholders(&mut self) -> Vec<InsightField> {
        let missing = self.missing_fields();
        for field in &missing {
            let placeholder = field.placeholder().to_string();
            if let Some(text) = self.text_mut(*field) {
                *text = placeholder;
            } else if let Some(list) = self.list_mut(*field) {
                *list = vec![placeholder];
            }
        }
        missing
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A question/answer pair from the authoritative knowledge source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            answer: Some(answer.into()),
        }
    }

    /// Both sides trimmed, or `None` when either is missing or blank.
    pub fn complete(&self) -> Option<(&str, &str)> {
        let question = self.question.as_deref().map(str::trim).filter(|q| !q.is_empty())?;
        let answer = self.answer.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
        Some((question, answer))
    }
}

/// A row of the vector-indexed documents table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeDocument {
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: Value,
}

impl KnowledgeDocument {
    pub fn from_pair(question: &str, answer: &str, embedding: Vec<f32>) -> Self {
        Self {
            content: Self::format_content(question, answer),
            embedding,
            metadata: json!({ "question": question }),
        }
    }

    pub fn format_content(question: &str, answer: &str) -> String {
        format!("Q: {}\nA: {}", question, answer)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KnowledgeMatch {
    pub content: String,
    #[serde(default)]
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_pairs_are_detected() {
        assert_eq!(
            QaPair::new(" What time? ", " 10am ").complete(),
            Some(("What time?", "10am"))
        );
        assert!(QaPair::new("Question", "   ").complete().is_none());
        assert!(QaPair { question: None, answer: Some("a".into()) }.complete().is_none());
    }

    #[test]
    fn test_document_content_format() {
        let doc = KnowledgeDocument::from_pair("Where are you?", "Main street 1", vec![0.1, 0.2]);
        assert_eq!(doc.content, "Q: Where are you?\nA: Main street 1");
        assert_eq!(doc.metadata["question"], "Where are you?");
    }
}

use tracing::debug;

pub const DOMAIN_KEYWORDS: &[&str] = &[
    "school",
    "mar baselios",
    "education",
    "student",
    "teacher",
    "class",
    "facility",
    "location",
    "contact",
    "admission",
    "timing",
    "vision",
    "mission",
    "curriculum",
    "sports",
    "library",
    "laboratory",
    "fee",
    "grade",
    "kindergarten",
    "primary",
    "secondary",
    "principal",
    "staff",
];

pub const REDIRECT_MESSAGE: &str = "Sorry, I can only answer questions related to Mar Baselios School. \
Please ask me about our facilities, location, timings, admission process, or any other school-related information.";

/// Decides whether a question is about the school at all.
#[derive(Debug, Clone)]
pub struct TopicGate {
    keywords: Vec<String>,
}

impl TopicGate {
    pub fn new() -> Self {
        Self::with_keywords(DOMAIN_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the question names a domain keyword, or when the whole
    /// question appears verbatim (case-insensitive) inside the knowledge text.
    ///
    /// The second clause passes any short phrase the document happens to
    /// contain, e.g. "the". Callers reject empty questions before this point.
    pub fn in_scope(&self, question: &str, knowledge_content: &str) -> bool {
        let question = question.to_lowercase();

        if let Some(keyword) = self.keywords.iter().find(|k| question.contains(k.as_str())) {
            debug!("Question in scope via keyword '{}'", keyword);
            return true;
        }

        let in_content = knowledge_content.to_lowercase().contains(&question);
        if in_content {
            debug!("Question in scope as a substring of the knowledge content");
        }
        in_content
    }
}

impl Default for TopicGate {
    fn default() -> Self {
        Self::new()
    }
}

use tracing::debug;

pub const UNSPECIFIC_QUESTION_MESSAGE: &str = "Based on the information I have about Mar Baselios School, \
I can tell you that we are a prestigious educational institution focused on providing quality education. \
Could you please ask a more specific question about our facilities, location, timings, or curriculum?";

const SENTENCE_DELIMITER: &str = ". ";
const MAX_EXTRACTED_SENTENCES: usize = 2;
const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Location,
    Vision,
    Timings,
    Contact,
    Facilities,
    Curriculum,
    Faculty,
    General,
}

/// What the knowledge text must mention before a rule may answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corroboration {
    Always,
    AnyOf(&'static [&'static str]),
}

impl Corroboration {
    fn holds(&self, content_lower: &str) -> bool {
        match self {
            Corroboration::Always => true,
            Corroboration::AnyOf(phrases) => phrases.iter().any(|p| content_lower.contains(p)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRule {
    pub category: Category,
    pub triggers: &'static [&'static str],
    pub corroboration: Corroboration,
    pub answer: &'static str,
}

impl ResponseRule {
    pub fn is_triggered_by(&self, question_lower: &str) -> bool {
        self.triggers.iter().any(|t| question_lower.contains(t))
    }

    pub fn applies(&self, question_lower: &str, content_lower: &str) -> bool {
        self.is_triggered_by(question_lower) && self.corroboration.holds(content_lower)
    }
}

// Evaluated top to bottom; the order is part of the observable behaviour.
const RULES: &[ResponseRule] = &[
    ResponseRule {
        category: Category::Location,
        triggers: &["location", "where", "address"],
        corroboration: Corroboration::AnyOf(&["located", "heart of the city"]),
        answer: "Mar Baselios School is located in the heart of the city. For the exact address and directions, \
please contact our office for detailed location information.",
    },
    ResponseRule {
        category: Category::Vision,
        triggers: &["vision", "mission", "goal"],
        corroboration: Corroboration::AnyOf(&["vision"]),
        answer: "Our school was founded with the vision of providing quality education that nurtures both \
academic excellence and character development. We believe in holistic education that prepares students \
not just for academic success, but for life.",
    },
    ResponseRule {
        category: Category::Timings,
        triggers: &["timing", "time", "hours", "schedule"],
        corroboration: Corroboration::AnyOf(&["8:00 am", "3:00 pm"]),
        answer: "Our school timings are from 8:00 AM to 3:00 PM, Monday through Friday.",
    },
    ResponseRule {
        category: Category::Contact,
        triggers: &["contact", "phone", "email", "reach"],
        corroboration: Corroboration::AnyOf(&["contact", "inquiries"]),
        answer: "For admissions and general inquiries, please contact our office at +91-XXXXXXXXXX \
or email us at info@marbaseliossschool.edu.",
    },
    ResponseRule {
        category: Category::Facilities,
        triggers: &["facilities", "facility", "laboratory", "library", "sports"],
        corroboration: Corroboration::AnyOf(&["facilities", "laboratory", "library"]),
        answer: "The school features modern facilities including well-equipped laboratories, a library, \
computer center, sports grounds, and auditorium. These facilities support our comprehensive educational approach.",
    },
    ResponseRule {
        category: Category::Curriculum,
        triggers: &["class", "grade", "curriculum", "subjects"],
        corroboration: Corroboration::AnyOf(&["kindergarten", "grade 12", "curriculum"]),
        answer: "We offer classes from kindergarten through grade 12, with a comprehensive curriculum that \
includes science, mathematics, languages, arts, and sports.",
    },
    ResponseRule {
        category: Category::Faculty,
        triggers: &["teacher", "faculty", "staff"],
        corroboration: Corroboration::AnyOf(&["faculty", "experienced"]),
        answer: "Our experienced faculty is dedicated to creating a supportive learning environment where \
every student can thrive. They are committed to both academic excellence and character development.",
    },
    ResponseRule {
        category: Category::General,
        triggers: &["about", "tell me", "information"],
        corroboration: Corroboration::Always,
        answer: "Mar Baselios School is a prestigious educational institution that provides quality education \
nurturing both academic excellence and character development. We offer comprehensive education from \
kindergarten through grade 12 with modern facilities and experienced faculty.",
    },
];

/// Which branch of the responder produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Rule(Category),
    Extracted,
    Unspecific,
}

/// Deterministic keyword responder used when the completion service is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResponder;

impl RuleBasedResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn rules(&self) -> &'static [ResponseRule] {
        RULES
    }

    pub fn respond(&self, question: &str, knowledge_content: &str) -> String {
        self.classify(question, knowledge_content).1
    }

    pub fn classify(&self, question: &str, knowledge_content: &str) -> (Classification, String) {
        let question = question.to_lowercase();
        let content_lower = knowledge_content.to_lowercase();

        if let Some(rule) = RULES.iter().find(|r| r.applies(&question, &content_lower)) {
            debug!("Fallback responder matched {:?} rule", rule.category);
            return (Classification::Rule(rule.category), rule.answer.to_string());
        }

        match extract_relevant_sentences(&question, knowledge_content) {
            Some(extract) => {
                debug!("Fallback responder extracted sentences from knowledge content");
                (Classification::Extracted, extract)
            }
            None => (Classification::Unspecific, UNSPECIFIC_QUESTION_MESSAGE.to_string()),
        }
    }
}

fn extract_relevant_sentences(question_lower: &str, knowledge_content: &str) -> Option<String> {
    let words: Vec<&str> = question_lower
        .split(' ')
        .filter(|w| w.chars().count() > MIN_SIGNIFICANT_WORD_LEN)
        .collect();

    let relevant: Vec<&str> = knowledge_content
        .split(SENTENCE_DELIMITER)
        .filter(|sentence| {
            let sentence = sentence.to_lowercase();
            words.iter().any(|w| sentence.contains(w))
        })
        .collect();

    if relevant.is_empty() {
        return None;
    }

    let mut extract = relevant
        .iter()
        .take(MAX_EXTRACTED_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join(SENTENCE_DELIMITER);
    if relevant.len() > 1 {
        extract.push('.');
    }
    Some(extract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_CONTENT;

    fn answer_for(category: Category) -> &'static str {
        RULES.iter().find(|r| r.category == category).unwrap().answer
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let order: Vec<Category> = RuleBasedResponder::new().rules().iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Location,
                Category::Vision,
                Category::Timings,
                Category::Contact,
                Category::Facilities,
                Category::Curriculum,
                Category::Faculty,
                Category::General,
            ]
        );
    }

    #[test]
    fn test_timings_against_default_content() {
        let responder = RuleBasedResponder::new();
        let answer = responder.respond("what are the school timings?", DEFAULT_CONTENT);
        assert_eq!(answer, "Our school timings are from 8:00 AM to 3:00 PM, Monday through Friday.");
    }

    #[test]
    fn test_each_category_against_default_content() {
        let responder = RuleBasedResponder::new();
        let cases = [
            ("where is the school located?", Category::Location),
            ("what is the school's vision?", Category::Vision),
            ("what facilities does the school have?", Category::Facilities),
            ("which subjects are offered?", Category::Curriculum),
            ("are the teachers good?", Category::Faculty),
        ];

        for (question, category) in cases {
            let (classification, answer) = responder.classify(question, DEFAULT_CONTENT);
            assert_eq!(classification, Classification::Rule(category), "question: {}", question);
            assert_eq!(answer, answer_for(category));
        }
    }

    #[test]
    fn test_contact_question_is_unspecific_against_default_content() {
        // the default document never mentions contact details
        let (classification, answer) =
            RuleBasedResponder::new().classify("how can i contact the school?", DEFAULT_CONTENT);
        assert_eq!(classification, Classification::Unspecific);
        assert_eq!(answer, UNSPECIFIC_QUESTION_MESSAGE);
    }

    #[test]
    fn test_timing_beats_contact_when_corroborated() {
        let content = "Classes run 8:00 AM to 3:00 PM. Contact the office for details.";
        let (classification, _) =
            RuleBasedResponder::new().classify("what time can i contact you by phone?", content);
        assert_eq!(classification, Classification::Rule(Category::Timings));
    }

    #[test]
    fn test_uncorroborated_rule_falls_through_to_next_rule() {
        // timing is triggered but the content has no hours, so contact answers
        let content = "Contact the office for details.";
        let (classification, _) =
            RuleBasedResponder::new().classify("what time can i contact you?", content);
        assert_eq!(classification, Classification::Rule(Category::Contact));
    }

    #[test]
    fn test_general_rule_short_circuits_extractor() {
        let (classification, answer) =
            RuleBasedResponder::new().classify("tell me about cats", "A cat sat. A dog ran.");
        assert_eq!(classification, Classification::Rule(Category::General));
        assert_eq!(answer, answer_for(Category::General));
    }

    #[test]
    fn test_extractor_joins_first_two_matches() {
        let content = "Dogs bark loudly. Cats purr softly. Dogs also run. Birds sing.";
        let answer = RuleBasedResponder::new().respond("do dogs purr", content);
        assert_eq!(answer, "Dogs bark loudly. Cats purr softly.");
    }

    #[test]
    fn test_extractor_single_match_has_no_trailing_period() {
        let content = "Dogs bark loudly. Birds sing";
        let (classification, answer) = RuleBasedResponder::new().classify("birds", content);
        assert_eq!(classification, Classification::Extracted);
        assert_eq!(answer, "Birds sing");
    }

    #[test]
    fn test_extractor_ignores_short_words() {
        let content = "A cat sat. A dog ran.";
        let (classification, answer) = RuleBasedResponder::new().classify("a cat", content);
        assert_eq!(classification, Classification::Unspecific);
        assert_eq!(answer, UNSPECIFIC_QUESTION_MESSAGE);
    }

    #[test]
    fn test_question_case_does_not_matter() {
        let responder = RuleBasedResponder::new();
        assert_eq!(
            responder.respond("WHAT ARE THE SCHOOL TIMINGS?", DEFAULT_CONTENT),
            responder.respond("what are the school timings?", DEFAULT_CONTENT)
        );
    }

    #[test]
    fn test_responder_is_deterministic() {
        let responder = RuleBasedResponder::new();
        let questions = ["where is it", "hostel rooms", "kids fest", "", "robotics labs"];
        for question in questions {
            let first = responder.respond(question, DEFAULT_CONTENT);
            let second = responder.respond(question, DEFAULT_CONTENT);
            assert_eq!(first, second);
            assert!(!first.is_empty());
        }
    }
}

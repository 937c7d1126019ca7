//! Prompt construction for the two pipeline stages.

use std::fmt::Write;

use llm_service::ChatMessage;
use quiz_scraper::Question;

/// Sentinel the extraction stage returns for questions the reference
/// material does not cover.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Bulk context-extraction request covering every question at once.
///
/// The model must answer with one JSON object mapping question numbers
/// (as strings) to the relevant facts, or to [`NOT_FOUND`].
pub fn context_extraction(questions: &[Question], context_doc: &str) -> Vec<ChatMessage> {
    let system = format!(
        "You extract facts from reference material for a quiz. \
         For every numbered question, copy the sentences from the material \
         that decide the answer. Respond with a single JSON object mapping \
         each question number (as a string) to the extracted facts. \
         If the material says nothing about a question, use the exact value \
         \"{NOT_FOUND}\". No commentary, JSON only."
    );

    let mut user = String::from("Reference material:\n");
    user.push_str(context_doc);
    user.push_str("\n\nQuestions:\n");
    for question in questions {
        let _ = writeln!(user, "{}. {}", question.number, question.text);
        let _ = writeln!(user, "   Options: {}", options_line(question));
    }

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Single-question solve request.
///
/// `facts` carries the extraction stage output for this question when
/// the stage produced any.
pub fn solve(question: &Question, facts: Option<&str>) -> Vec<ChatMessage> {
    let system = "You answer one multiple-choice question. Respond with a \
                  single JSON object of the form {\"answer\": n} where n is \
                  the zero-based index of the correct option. JSON only, no \
                  explanation."
        .to_string();

    let mut user = String::new();
    match facts {
        Some(facts) => {
            let _ = writeln!(user, "Relevant facts:\n{facts}\n");
        }
        None => {
            let _ = writeln!(
                user,
                "No reference material covers this question; answer from \
                 your general knowledge.\n"
            );
        }
    }
    let _ = writeln!(user, "Question: {}", question.text);
    let _ = write!(user, "Options: {}", options_line(question));

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Options rendered on one line as `[0] first | [1] second`.
fn options_line(question: &Question) -> String {
    question
        .options
        .iter()
        .map(|opt| format!("[{}] {}", opt.index, opt.text))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_scraper::QuestionOption;

    fn question() -> Question {
        Question {
            number: 2,
            text: "What is 2+2?".to_string(),
            options: vec![
                QuestionOption {
                    index: 0,
                    id: "a".to_string(),
                    text: "3".to_string(),
                },
                QuestionOption {
                    index: 1,
                    id: "b".to_string(),
                    text: "4".to_string(),
                },
            ],
        }
    }

    #[test]
    fn solve_prompt_lists_indexed_options() {
        let messages = solve(&question(), None);
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("[0] 3 | [1] 4"));
    }

    #[test]
    fn solve_prompt_includes_facts_when_present() {
        let messages = solve(&question(), Some("2+2 equals 4."));
        assert!(messages[1].content.contains("2+2 equals 4."));
        assert!(!messages[1].content.contains("general knowledge"));
    }

    #[test]
    fn solve_prompt_without_facts_directs_to_general_knowledge() {
        let messages = solve(&question(), None);
        assert!(messages[1].content.contains("general knowledge"));
        assert!(!messages[1].content.contains("Relevant facts"));
    }

    #[test]
    fn extraction_prompt_numbers_every_question() {
        let questions = vec![question()];
        let messages = context_extraction(&questions, "Some notes.");
        assert!(messages[1].content.contains("2. What is 2+2?"));
        assert!(messages[0].content.contains(NOT_FOUND));
    }
}

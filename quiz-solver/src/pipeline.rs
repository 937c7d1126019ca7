//! Stage two: solve each question in turn, streaming progress.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use llm_service::extract_payload;
use quiz_scraper::Question;

use crate::{
    backend::Completion,
    context_stage::{self, ContextMap},
    events::StreamEvent,
    prompt,
};

/// Delay inserted between consecutive solver calls.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub inter_question: Duration,
}

impl Pacing {
    /// No delay, for tests.
    pub fn none() -> Self {
        Self {
            inter_question: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            inter_question: Duration::from_millis(250),
        }
    }
}

/// How a streaming run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The consumer went away before the run finished.
    Cancelled,
}

#[derive(Deserialize)]
struct AnswerReply {
    answer: i64,
}

/// The two-stage solving pipeline.
///
/// `E` answers the bulk context-extraction call, `S` the per-question
/// solve calls. Both are [`ChatService`](llm_service::ChatService) in
/// production.
pub struct SolverPipeline<E, S> {
    extraction: E,
    solver: S,
    pacing: Pacing,
}

impl<E: Completion, S: Completion> SolverPipeline<E, S> {
    pub fn new(extraction: E, solver: S, pacing: Pacing) -> Self {
        Self {
            extraction,
            solver,
            pacing,
        }
    }

    /// Runs the pipeline, pushing [`StreamEvent`]s into `tx` as it goes.
    ///
    /// A closed channel is the cancellation signal: the loop checks it
    /// before every model call and stops without further work once the
    /// consumer is gone. Questions whose reply cannot be resolved to an
    /// option are skipped; the run still ends with a single `Done`.
    pub async fn run_streaming(
        &self,
        questions: &[Question],
        context_doc: &str,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> RunOutcome {
        let total = questions.len();
        if total == 0 {
            let _ = tx.send(StreamEvent::done()).await;
            return RunOutcome::Completed;
        }

        if tx
            .send(StreamEvent::status(
                "Reading reference material",
                format!("0/{total}"),
            ))
            .await
            .is_err()
        {
            return RunOutcome::Cancelled;
        }
        if tx.is_closed() {
            return RunOutcome::Cancelled;
        }
        let context = context_stage::extract_context(&self.extraction, questions, context_doc).await;

        for (i, question) in questions.iter().enumerate() {
            if i > 0 && !self.pacing.inter_question.is_zero() {
                sleep(self.pacing.inter_question).await;
            }

            let progress = format!("{}/{total}", i + 1);
            if tx
                .send(StreamEvent::status(
                    format!("Solving question {}", question.number),
                    progress,
                ))
                .await
                .is_err()
            {
                return RunOutcome::Cancelled;
            }
            if tx.is_closed() {
                return RunOutcome::Cancelled;
            }

            match self.solve_one(question, &context).await {
                Some(target_id) => {
                    info!(number = question.number, target = %target_id, "question solved");
                    if tx
                        .send(StreamEvent::result(question.number, target_id))
                        .await
                        .is_err()
                    {
                        return RunOutcome::Cancelled;
                    }
                }
                None => {
                    warn!(number = question.number, "skipping unresolved question");
                }
            }
        }

        let _ = tx.send(StreamEvent::done()).await;
        RunOutcome::Completed
    }

    /// Runs the pipeline without streaming, collecting click targets.
    ///
    /// Failure containment matches the streaming run: a failed or
    /// unresolvable question is skipped and the remaining questions
    /// still run, so partial target lists are the steady state.
    pub async fn run_batch(&self, questions: &[Question], context_doc: &str) -> Vec<String> {
        if questions.is_empty() {
            return Vec::new();
        }

        let context = context_stage::extract_context(&self.extraction, questions, context_doc).await;

        let mut targets = Vec::new();
        for (i, question) in questions.iter().enumerate() {
            if i > 0 && !self.pacing.inter_question.is_zero() {
                sleep(self.pacing.inter_question).await;
            }

            match self.solve_one(question, &context).await {
                Some(target_id) => targets.push(target_id),
                None => warn!(number = question.number, "skipping unresolved question"),
            }
        }
        targets
    }

    /// One solver call, absorbing per-question failures into `None`.
    async fn solve_one(&self, question: &Question, context: &ContextMap) -> Option<String> {
        let facts = context_stage::facts_for(context, question.number);
        let messages = prompt::solve(question, facts);
        match self.solver.complete(&messages).await {
            Ok(raw) => resolve_target(question, &raw),
            Err(err) => {
                warn!(number = question.number, error = %err, "solver call failed");
                None
            }
        }
    }
}

/// Maps a raw model reply to the click target of the chosen option.
fn resolve_target(question: &Question, raw: &str) -> Option<String> {
    let payload = extract_payload(raw)?;
    let reply: AnswerReply = match serde_json::from_str(&payload) {
        Ok(reply) => reply,
        Err(err) => {
            debug!(number = question.number, error = %err, "malformed answer payload");
            return None;
        }
    };
    let index = usize::try_from(reply.answer).ok()?;
    question
        .options
        .iter()
        .find(|opt| opt.index == index)
        .map(|opt| opt.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use llm_service::{ChatMessage, LlmError, ProviderError};

    use crate::backend::Completion;

    /// Backend replaying a fixed script of replies.
    struct Scripted {
        replies: Mutex<Vec<Result<String, ()>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, ()>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Completion for Scripted {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            match replies.remove(0) {
                Ok(raw) => Ok(raw),
                Err(()) => Err(LlmError::Provider(ProviderError::EmptyChoices)),
            }
        }
    }

    fn question(number: u32) -> Question {
        Question {
            number,
            text: format!("Question {number}?"),
            options: vec![
                quiz_scraper::QuestionOption {
                    index: 0,
                    id: format!("q{number}_a"),
                    text: "first".to_string(),
                },
                quiz_scraper::QuestionOption {
                    index: 1,
                    id: format!("q{number}_b"),
                    text: "second".to_string(),
                },
            ],
        }
    }

    fn answer(index: i64) -> Result<String, ()> {
        Ok(format!(r#"{{"answer": {index}}}"#))
    }

    async fn collect(
        pipeline: &SolverPipeline<Scripted, Scripted>,
        questions: &[Question],
    ) -> (RunOutcome, Vec<StreamEvent>) {
        let (tx, mut rx) = mpsc::channel(32);
        let outcome = pipeline.run_streaming(questions, "notes", &tx).await;
        drop(tx);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        (outcome, events)
    }

    #[tokio::test]
    async fn streaming_run_emits_ordered_events() {
        let extraction = Scripted::new(vec![Ok(r#"{"1": "fact one", "2": "NOT_FOUND"}"#.into())]);
        let solver = Scripted::new(vec![answer(0), answer(1)]);
        let pipeline = SolverPipeline::new(extraction, solver, Pacing::none());
        let questions = vec![question(1), question(2)];

        let (outcome, events) = collect(&pipeline, &questions).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], StreamEvent::Status { .. }));
        assert_eq!(events[2], StreamEvent::result(1, "q1_a"));
        assert_eq!(events[4], StreamEvent::result(2, "q2_b"));
        assert_eq!(events[5], StreamEvent::done());
    }

    #[tokio::test]
    async fn empty_question_list_yields_only_done() {
        let extraction = Scripted::new(vec![]);
        let solver = Scripted::new(vec![]);
        let pipeline = SolverPipeline::new(extraction, solver, Pacing::none());

        let (outcome, events) = collect(&pipeline, &[]).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(events, vec![StreamEvent::done()]);
        assert_eq!(pipeline.extraction.calls(), 0);
        assert_eq!(pipeline.solver.calls(), 0);
    }

    #[tokio::test]
    async fn unresolved_questions_are_skipped_not_fatal() {
        let extraction = Scripted::new(vec![Ok("{}".into())]);
        let solver = Scripted::new(vec![
            answer(0),
            Ok("not json at all".into()),
            answer(7), // out of range
            Err(()),
            answer(1),
        ]);
        let pipeline = SolverPipeline::new(extraction, solver, Pacing::none());
        let questions: Vec<Question> = (1..=5).map(question).collect();

        let (outcome, events) = collect(&pipeline, &questions).await;

        assert_eq!(outcome, RunOutcome::Completed);
        let results: Vec<&StreamEvent> = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Result { .. }))
            .collect();
        assert_eq!(
            results,
            vec![&StreamEvent::result(1, "q1_a"), &StreamEvent::result(5, "q5_b")]
        );
        assert_eq!(events.last(), Some(&StreamEvent::done()));
    }

    #[tokio::test]
    async fn closed_channel_cancels_before_further_calls() {
        let extraction = Scripted::new(vec![Ok("{}".into())]);
        let solver = Scripted::new(vec![answer(0), answer(0), answer(0)]);
        // A short real delay gives the consumer task a turn to run.
        let pacing = Pacing {
            inter_question: Duration::from_millis(5),
        };
        let pipeline = SolverPipeline::new(extraction, solver, pacing);
        let questions: Vec<Question> = (1..=3).map(question).collect();

        let (tx, mut rx) = mpsc::channel(32);
        // Consume the first result, then walk away.
        let consumer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if matches!(event, StreamEvent::Result { .. }) {
                    break;
                }
            }
        });

        let outcome = pipeline.run_streaming(&questions, "", &tx).await;
        consumer.await.unwrap();

        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(pipeline.solver.calls() < 3);
    }

    #[tokio::test]
    async fn batch_run_collects_targets_in_order() {
        let extraction = Scripted::new(vec![Ok("{}".into())]);
        let solver = Scripted::new(vec![answer(1), Ok("garbage".into()), answer(0)]);
        let pipeline = SolverPipeline::new(extraction, solver, Pacing::none());
        let questions: Vec<Question> = (1..=3).map(question).collect();

        let targets = pipeline.run_batch(&questions, "notes").await;
        assert_eq!(targets, vec!["q1_b".to_string(), "q3_a".to_string()]);
    }

    #[tokio::test]
    async fn batch_run_skips_failed_question_and_continues() {
        let extraction = Scripted::new(vec![Ok("{}".into())]);
        let solver = Scripted::new(vec![answer(0), Err(()), answer(1)]);
        let pipeline = SolverPipeline::new(extraction, solver, Pacing::none());
        let questions: Vec<Question> = (1..=3).map(question).collect();

        let targets = pipeline.run_batch(&questions, "notes").await;

        assert_eq!(targets, vec!["q1_a".to_string(), "q3_b".to_string()]);
        assert_eq!(pipeline.solver.calls(), 3);
    }

    #[test]
    fn resolve_target_handles_wrapped_payloads() {
        let q = question(1);
        let raw = "<think>reasoning</think>```json\n{\"answer\": 1}\n```";
        assert_eq!(resolve_target(&q, raw), Some("q1_b".to_string()));
        assert_eq!(resolve_target(&q, r#"{"answer": -1}"#), None);
        assert_eq!(resolve_target(&q, "no braces"), None);
    }
}

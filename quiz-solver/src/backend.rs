//! Seam between the pipeline and whichever chat backend answers it.

use llm_service::{ChatMessage, ChatService, LlmError};

/// A chat completion backend the pipeline can call.
///
/// The production implementation is [`ChatService`]; tests substitute
/// scripted backends.
pub trait Completion: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

impl Completion for ChatService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        ChatService::complete(self, messages).await
    }
}

impl<T: Completion> Completion for std::sync::Arc<T> {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        (**self).complete(messages).await
    }
}

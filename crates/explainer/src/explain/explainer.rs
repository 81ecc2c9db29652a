use crate::completion::Completion;
use crate::error::CompletionError;
use explainer_core::explain::{build_prompt, ExplanationRequest, ExplanationResult};

/// Runs one explanation: build the prompt, make one completion call, wrap the text.
///
/// The wrapper does not validate the request and does not translate errors;
/// callers reject empty code before reaching it.
pub struct Explainer<C> {
    client: C,
}

impl<C: Completion> Explainer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        request: &ExplanationRequest,
    ) -> Result<ExplanationResult, CompletionError> {
        let prompt = build_prompt(&request.code, &request.language);
        let explanation_text = self.client.complete(&prompt.system, &prompt.human).await?;

        Ok(ExplanationResult { explanation_text })
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }
}

//! Math and string functions: the reply is the answer.

use llmfn_llm::{ChatBackend, PromptId};
use tracing::info;

use crate::{LlmFunctions, Result};

impl<B: ChatBackend> LlmFunctions<B> {
    /// Ask a math question and get the bare numerical answer back.
    ///
    /// # Errors
    /// Fails if the model call fails or the reply is empty.
    pub async fn math(&self, question: &str) -> Result<String> {
        info!(question, "Processing math question");
        let answer = self
            .run_prompt("math", PromptId::Math, &[("question", question)])
            .await?;
        info!(answer = %answer, "Math answer received");
        Ok(answer)
    }

    /// Apply a named text operation (`reverse`, `capitalize`,
    /// `count_words`, `remove_punctuation`, `convert_format`, ...).
    ///
    /// The operation name is passed to the model as-is.
    ///
    /// # Errors
    /// Fails if the model call fails or the reply is empty.
    pub async fn string(&self, operation: &str, text: &str) -> Result<String> {
        info!(operation, chars = text.len(), "Processing string operation");
        self.run_prompt(
            "string",
            PromptId::String,
            &[("operation", operation), ("text", text)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{ScriptedBackend, functions};

    #[tokio::test]
    async fn math_returns_trimmed_answer() {
        let f = functions(ScriptedBackend::replying(["\n 4 \n"]));
        assert_eq!(f.math("2 + 2=").await.expect("math"), "4");

        let req = f.backend().last_request();
        assert_eq!(req.messages.len(), 2);
        assert!(req.messages[0].content.text().contains("mathematical computation"));
        assert_eq!(req.messages[1].content.text(), "2 + 2=");
    }

    #[tokio::test]
    async fn string_sends_operation_and_text() {
        let f = functions(ScriptedBackend::replying(["dlrow olleh"]));
        let out = f.string("reverse", "hello world").await.expect("string");
        assert_eq!(out, "dlrow olleh");

        let user = f.backend().last_request().messages[1].content.text();
        assert_eq!(user, "Input Operation: reverse\nInput Text: hello world");
    }

    #[tokio::test]
    async fn braces_in_input_are_sent_verbatim() {
        let f = functions(ScriptedBackend::replying(["2"]));
        f.string("count_words", "{operation} {text}").await.expect("string");
        let user = f.backend().last_request().messages[1].content.text();
        assert!(user.ends_with("Input Text: {operation} {text}"));
    }
}

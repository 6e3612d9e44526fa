use serde::Deserialize;

use crate::domain::{DomainError, PromptTemplate};

pub const CONVERSATION_TEMPLATE: &str = "The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.

Current conversation:
{history}
Human: {input}
AI:";

pub const CONDENSE_QUESTION_TEMPLATE: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{chat_history}
Follow Up Input: {question}
Standalone question:";

pub const QA_TEMPLATE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

/// Prompt set used by both chains.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainPrompts {
    pub conversation: PromptTemplate,
    pub condense_question: PromptTemplate,
    pub qa: PromptTemplate,
}

impl ChainPrompts {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.conversation.validate(&["history", "input"])?;
        self.condense_question.validate(&["chat_history", "question"])?;
        self.qa.validate(&["context", "question"])
    }
}

impl Default for ChainPrompts {
    fn default() -> Self {
        Self {
            conversation: CONVERSATION_TEMPLATE.into(),
            condense_question: CONDENSE_QUESTION_TEMPLATE.into(),
            qa: QA_TEMPLATE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts_are_valid() {
        ChainPrompts::default().validate().unwrap();
    }

    #[test]
    fn test_qa_prompt_without_context_is_rejected() {
        let prompts = ChainPrompts {
            qa: PromptTemplate::new("Question: {question}"),
            ..ChainPrompts::default()
        };

        assert!(matches!(
            prompts.validate(),
            Err(DomainError::Configuration(_))
        ));
    }
}

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::ChatHistory, Conversation, DomainError, Message};

/// Process-local conversation buffer. Grows without bound.
pub struct InMemoryChatHistory {
    conversation: RwLock<Conversation>,
}

impl InMemoryChatHistory {
    pub fn new() -> Self {
        Self {
            conversation: RwLock::new(Conversation::new()),
        }
    }

    pub fn snapshot(&self) -> Result<Conversation, DomainError> {
        self.conversation
            .read()
            .map(|c| c.clone())
            .map_err(|e| DomainError::internal(e.to_string()))
    }
}

impl Default for InMemoryChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatHistory for InMemoryChatHistory {
    async fn messages(&self) -> Result<Vec<Message>, DomainError> {
        self.snapshot().map(|c| c.messages)
    }

    async fn append(&self, messages: Vec<Message>) -> Result<(), DomainError> {
        let mut conversation = self
            .conversation
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        for message in messages {
            conversation.push(message);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut conversation = self
            .conversation
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        *conversation = Conversation::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let history = InMemoryChatHistory::new();

        history
            .append(vec![Message::user("a"), Message::assistant("b")])
            .await
            .unwrap();
        history.append(vec![Message::user("c")]).await.unwrap();

        let contents: Vec<String> = history
            .messages()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clear_starts_new_conversation() {
        let history = InMemoryChatHistory::new();
        let before = history.snapshot().unwrap().id;

        history.append(vec![Message::user("a")]).await.unwrap();
        history.clear().await.unwrap();

        let after = history.snapshot().unwrap();
        assert!(after.is_empty());
        assert_ne!(after.id, before);
    }
}

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::application::{ConversationChain, ConversationalRetrievalChain};
use crate::infrastructure::{AppConfig, Assistant};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub plain_chain: Arc<ConversationChain>,
    /// Replaced wholesale on every document upload.
    pub grounded_chain: Arc<RwLock<Option<Arc<ConversationalRetrievalChain>>>>,
    /// Serializes answers so each exchange lands in history as a unit.
    pub answer_lock: Arc<Mutex<()>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(assistant: Assistant, config: AppConfig) -> Self {
        let plain_chain = Arc::new(assistant.build_plain_chain());
        Self {
            assistant: Arc::new(assistant),
            plain_chain,
            grounded_chain: Arc::new(RwLock::new(None)),
            answer_lock: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        }
    }

    pub async fn set_grounded_chain(&self, chain: ConversationalRetrievalChain) {
        *self.grounded_chain.write().await = Some(Arc::new(chain));
    }

    pub async fn grounded_chain(&self) -> Option<Arc<ConversationalRetrievalChain>> {
        self.grounded_chain.read().await.clone()
    }
}

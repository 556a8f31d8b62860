use super::types::{Message, MessageId, MessageMetadata, Role};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<Message>,
    next_id: MessageId,
}

/// Append-only ordered log of the conversation
///
/// Clones share the same underlying log, so presentation code can hold a
/// handle while the session controller appends to it.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    inner: Arc<RwLock<Transcript>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return the stored copy
    ///
    /// Ids keep increasing across `clear` so a stale id never names a new message.
    pub fn append(&self, role: Role, content: impl Into<String>, metadata: MessageMetadata) -> Message {
        let mut transcript = self.inner.write();
        let id = transcript.next_id;
        transcript.next_id += 1;
        let message = Message::new(id, role, content).with_metadata(metadata);
        transcript.messages.push(message.clone());
        message
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.inner.read().messages.last().cloned()
    }

    pub fn clear(&self) {
        self.inner.write().messages.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().messages.is_empty()
    }

    /// Serialize the current transcript as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.inner.read().messages)
    }
}

pub mod storage;
pub mod types;

pub use storage::TranscriptStore;
pub use types::{Message, MessageId, MessageMetadata, MessageSource, Role};

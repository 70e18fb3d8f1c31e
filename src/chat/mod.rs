pub mod coordinator;
pub mod message;
pub mod store;

pub use coordinator::{
    ChatCoordinator, ChatSnapshot, CompletionOutcome, Dispatch, RequestId, SubmitOutcome,
};
pub use message::{Message, MessageId, MessageStatus, WELCOME_TEXT};
pub use store::MessageStore;

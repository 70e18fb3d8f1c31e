pub mod error;

pub use error::HeartTalkError;

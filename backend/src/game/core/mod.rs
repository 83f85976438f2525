pub mod messages;
pub mod session;
mod word;

pub use messages::{FrameError, Message, Stroke};
pub use session::SessionState;
pub use word::{DEFAULT_WORDS, WordList, WordProvider};

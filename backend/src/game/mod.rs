pub mod core;
pub mod relay;

pub use self::core::messages;

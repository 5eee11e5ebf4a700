pub mod decoder;
pub mod error;
pub mod scratch;
pub mod thumbnail;

pub mod error;
pub mod feed;
pub mod record;
pub mod store;

pub mod ask;
pub mod chat;
pub mod dispatch;
pub mod endpoint;
pub mod key;
pub mod schema;

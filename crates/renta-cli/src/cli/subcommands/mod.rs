mod key;

pub use key::{KeyCommands, KeySetArgs};

pub mod handlers;
pub mod parser;
pub mod types;

pub use handlers::{CommandRouter, HELP_TEXT, STOP_TEXT, WELCOME_TEXT};
pub use parser::parse_command;
pub use types::Command;

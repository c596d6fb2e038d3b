// ABOUTME: Version, banner, and REPL constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const HOST: &str = "rust";
pub const PROMPT: &str = "user> ";
pub const HISTORY_FILE: &str = "parrot_history";

//! One module per subcommand. Handlers translate arguments into adapter and
//! core calls and render the result through the `OutputManager`.

pub mod completions;
pub mod config;
pub mod create;
pub mod init;
pub mod list;

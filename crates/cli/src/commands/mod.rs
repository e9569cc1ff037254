//! One module per subcommand. Each `run` returns the process exit code.

pub mod check;
pub mod dump;
pub mod get;
pub mod init;
pub mod scan;

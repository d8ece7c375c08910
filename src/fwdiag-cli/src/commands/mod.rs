//! Command handlers, one module per subcommand group.

pub mod db;
pub mod decode;

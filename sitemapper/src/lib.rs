pub mod commands;
pub mod handlers;
pub mod server;

pub use commands::command_argument_builder;
pub use handlers::{extractor_config_from_args, report_format_from_args};
pub use server::{AppState, build_router};

mod application;
pub mod data;
mod output;
mod report;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use output::{open_output, resolve_output_path};
pub use report::{configure_colors, format_diff};
pub use runtime_config::{Action, OutputTarget, RuntimeConfig};

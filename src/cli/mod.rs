mod cli;
mod listing_args;

pub use cli::{Cli, Command};
pub use listing_args::ListingArgs;

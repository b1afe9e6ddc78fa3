use std::path::PathBuf;

use tracing::debug;

use crate::cli::{Cli, Command, ListingArgs};
use crate::compare::CompareSettings;
use crate::config::{ConfigError, Options, read_options_file};

/// Where a listing goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// A requested file, `None` for the default name.
    File(Option<PathBuf>),
}

#[derive(Debug, Clone)]
pub enum Action {
    List {
        folders: Vec<PathBuf>,
        output: OutputTarget,
    },
    Compare {
        old: PathBuf,
        new: PathBuf,
        settings: CompareSettings,
        hide_matches: bool,
        color: bool,
    },
    Properties,
}

/// The resolved options and the action of one invocation.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub options: Options,
    pub action: Action,
}

impl RuntimeConfig {
    /// Starts from the options file when one is given, then applies the
    /// command line flags on top.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut options = match &cli.config {
            Some(path) => read_options_file(path)?,
            None => Options::default(),
        };

        let (action, listing) = match cli.command {
            Command::List {
                folders,
                output,
                listing,
            } => {
                let output = match output {
                    None => OutputTarget::Stdout,
                    Some(path) => OutputTarget::File(path),
                };
                (Action::List { folders, output }, listing)
            }
            Command::Compare {
                old,
                new,
                skip_children,
                compare_content,
                hide_matches,
                no_color,
                listing,
            } => {
                let settings = CompareSettings {
                    skip_children,
                    names_only: !compare_content,
                };
                let action = Action::Compare {
                    old,
                    new,
                    settings,
                    hide_matches,
                    color: !no_color,
                };
                (action, listing)
            }
            Command::Properties => (Action::Properties, ListingArgs::default()),
        };
        listing.apply(&mut options)?;
        debug!("Resolved options: {:?}", options);

        Ok(Self { options, action })
    }
}

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{
    Action, OutputTarget, RuntimeConfig, configure_colors, format_diff, open_output,
    resolve_output_path,
};
use crate::cli::Cli;
use crate::compare::{CompareError, CompareSettings, DiffKind, compare};
use crate::config::{ConfigError, Options};
use crate::ext::BestEffortPathExt;
use crate::format::PropertyRegistry;
use crate::lister::{ListError, Lister};

pub struct Application;

impl Application {
    pub fn run(cli: Cli) -> Result<(), ApplicationError> {
        let config = RuntimeConfig::from_cli(cli).context(ConfigSnafu)?;
        debug!("Running {:?}", config.action);

        match config.action {
            Action::List { folders, output } => Self::list(config.options, &folders, output),
            Action::Compare {
                old,
                new,
                settings,
                hide_matches,
                color,
            } => {
                configure_colors(color);
                Self::compare(config.options, &old, &new, settings, hide_matches)
            }
            Action::Properties => Self::properties(),
        }
    }

    fn list(options: Options, folders: &[PathBuf], output: OutputTarget) -> Result<(), ApplicationError> {
        let lister = Lister::new(options).context(ListSnafu)?;
        match output {
            OutputTarget::Stdout => {
                let mut out = io::stdout().lock();
                lister.write_list(folders, &mut out).context(ListSnafu)?;
            }
            OutputTarget::File(requested) => {
                let first_folder = folders.first().map_or(Path::new("."), PathBuf::as_path);
                let path = resolve_output_path(requested.as_deref(), first_folder, lister.options())
                    .context(OutputSnafu {
                        path: requested.unwrap_or_default(),
                    })?;
                info!("Writing listing to {}", path.best_effort_path_display());
                let file = open_output(&path, lister.options()).context(OutputSnafu { path: &path })?;
                let mut out = BufWriter::new(file);
                lister.write_list(folders, &mut out).context(ListSnafu)?;
            }
        }
        Ok(())
    }

    fn compare(
        options: Options,
        old: &Path,
        new: &Path,
        settings: CompareSettings,
        hide_matches: bool,
    ) -> Result<(), ApplicationError> {
        let lister = Lister::new(options).context(ListSnafu)?;
        let mut out = io::stdout().lock();
        let mut differences = 0;

        for item in compare(&lister, old, new, settings).context(CompareSnafu)? {
            let item = item.context(CompareSnafu)?;
            if item.diff != DiffKind::Match {
                differences += 1;
            } else if hide_matches {
                continue;
            }
            writeln!(out, "{}", format_diff(&item)).context(StdoutSnafu)?;
        }
        info!("Found {} difference(s)", differences);
        Ok(())
    }

    fn properties() -> Result<(), ApplicationError> {
        let mut out = io::stdout().lock();
        for name in PropertyRegistry::default().names() {
            writeln!(out, "{name}").context(StdoutSnafu)?;
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the options"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Critical failure encountered while listing"))]
    ListError { source: ListError },
    #[snafu(display("Critical failure encountered while comparing"))]
    CompareError { source: CompareError },
    #[snafu(display("Failed to open the output file {}", path.best_effort_path_display()))]
    OutputError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to write to stdout"))]
    StdoutError { source: io::Error },
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;
use crate::cli::ListingArgs;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Render folder trees to text listings and compare them")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// YAML file supplying option defaults; flags given on the command line win
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a listing of one or more folders
    List {
        /// Input folders, listed one after the other
        #[clap(default_value = ".")]
        folders: Vec<PathBuf>,

        /// Output file. Without a value the default file name is used; when
        /// omitted the listing is printed. Relative paths are resolved against
        /// the first input folder (see --rel-to-cwd)
        #[clap(long, short, num_args = 0..=1)]
        output: Option<Option<PathBuf>>,

        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Compare two folders or saved listings
    Compare {
        /// Older side: a folder or a listing file
        old: PathBuf,

        /// Newer side: a folder or a listing file
        #[clap(default_value = ".")]
        new: PathBuf,

        /// Report an added or deleted folder once instead of once per entry
        #[clap(long)]
        skip_children: bool,

        /// Report aligned files whose hash, size or date differ as changed
        #[clap(long)]
        compare_content: bool,

        /// Only print differences
        #[clap(long)]
        hide_matches: bool,

        /// Disable colored output
        #[clap(long)]
        no_color: bool,

        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Print the property names usable in format patterns
    Properties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatType, GroupType};

    #[test]
    fn list_defaults_to_current_folder_and_stdout() {
        let cli = Cli::try_parse_from(["listphile", "list"]).unwrap();
        match cli.command {
            Command::List {
                folders, output, ..
            } => {
                assert_eq!(folders, vec![PathBuf::from(".")]);
                assert_eq!(output, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn output_flag_without_value() {
        let cli = Cli::try_parse_from(["listphile", "list", "src", "-o"]).unwrap();
        match cli.command {
            Command::List { output, .. } => assert_eq!(output, Some(None)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn compare_with_format_flags() {
        let cli = Cli::try_parse_from([
            "listphile",
            "compare",
            "old.xml",
            "--format-type",
            "XML",
            "--item-grouping",
            "foldersfirst",
            "--skip-children",
            "--hash",
            "-l",
            "debug",
        ])
        .unwrap();
        match cli.command {
            Command::Compare {
                old,
                new,
                skip_children,
                listing,
                ..
            } => {
                assert_eq!(old, PathBuf::from("old.xml"));
                assert_eq!(new, PathBuf::from("."));
                assert!(skip_children);
                assert_eq!(listing.format_type, Some(FormatType::Xml));
                assert_eq!(listing.item_grouping, Some(GroupType::FoldersFirst));
                assert!(listing.show_hash);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_choice_is_rejected() {
        assert!(Cli::try_parse_from(["listphile", "list", "--format-type", "html"]).is_err());
    }
}

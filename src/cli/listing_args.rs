use clap::Args;

use crate::config::{
    ConfigError, DateType, FormatType, GroupType, NameType, Options, validate_date_format,
};
use crate::filesystem::{ItemFilter, NameKey};

/// Listing options shared by the `list` and `compare` commands.
///
/// Every field is optional so that only the flags actually given override
/// the options file.
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    // File output
    /// Resolve a relative --output against the working directory instead of the input folder
    #[clap(long, alias = "cwd", help_heading = "File output")]
    pub rel_to_cwd: bool,
    /// Append to the output file instead of overwriting it
    #[clap(long, help_heading = "File output")]
    pub append: bool,
    /// Text written before the listing
    #[clap(long, help_heading = "File output")]
    pub header: Option<String>,
    /// Text written after the listing
    #[clap(long, help_heading = "File output")]
    pub footer: Option<String>,

    // Layout
    /// Layout family
    #[clap(long, short = 'f', value_enum, ignore_case = true, help_heading = "Layout")]
    pub format_type: Option<FormatType>,
    /// Pattern for file lines, e.g. "{indent}{name}\n"; empty to omit files
    #[clap(long, help_heading = "Layout")]
    pub file_format: Option<String>,
    /// Pattern for folder lines; empty to omit folders
    #[clap(long, help_heading = "Layout")]
    pub dir_format: Option<String>,
    /// Pattern for the line closing a folder
    #[clap(long, help_heading = "Layout")]
    pub dir_close_format: Option<String>,
    /// Pattern for the line of the listed folder itself
    #[clap(long, help_heading = "Layout")]
    pub root_format: Option<String>,
    /// Pattern for the line replacing the content of folders at the maximum depth
    #[clap(long, help_heading = "Layout")]
    pub ellipsis_format: Option<String>,
    /// Indentation level of the listed folder
    #[clap(long, help_heading = "Layout")]
    pub start_level: Option<usize>,
    /// Maximum folder depth, 0 for unlimited [default: 20]
    #[clap(long, short = 'd', help_heading = "Layout")]
    pub max_depth: Option<usize>,
    /// Omit line indentation
    #[clap(long, help_heading = "Layout")]
    pub no_indent: bool,
    /// Indentation unit [default: " "]
    #[clap(long, help_heading = "Layout")]
    pub indent: Option<String>,
    /// Mark folders at the maximum depth with an ellipsis line
    #[clap(long, help_heading = "Layout")]
    pub show_ellipsis: bool,
    /// Ellipsis text of the plain layout [default: "..."]
    #[clap(long, help_heading = "Layout")]
    pub ellipsis: Option<String>,
    /// Extra property attached to every entry without being displayed
    #[clap(long = "property", value_name = "NAME", help_heading = "Layout")]
    pub properties: Vec<String>,

    // Sorting and filtering
    /// Exclude folders
    #[clap(long, help_heading = "Sorting and filtering")]
    pub no_folders: bool,
    /// Exclude files
    #[clap(long, help_heading = "Sorting and filtering")]
    pub no_files: bool,
    /// Exclude hidden entries
    #[clap(long, help_heading = "Sorting and filtering")]
    pub filter_hidden: bool,
    /// Exclude entries with this name
    #[clap(long, value_name = "NAME", help_heading = "Sorting and filtering")]
    pub exclude: Vec<String>,
    /// Relative order of folders and files
    #[clap(long, value_enum, ignore_case = true, help_heading = "Sorting and filtering")]
    pub item_grouping: Option<GroupType>,
    /// Sort names without regard to case
    #[clap(long, help_heading = "Sorting and filtering")]
    pub ignore_case: bool,

    // Properties
    /// How entries are named
    #[clap(long, value_enum, ignore_case = true, help_heading = "Properties")]
    pub name_type: Option<NameType>,
    /// How the listed folder is named [default: dot]
    #[clap(long, value_enum, ignore_case = true, help_heading = "Properties")]
    pub root_name_type: Option<NameType>,
    /// Display file sizes
    #[clap(long, alias = "size", help_heading = "Properties")]
    pub show_size: bool,
    /// Display file dates
    #[clap(long, alias = "date", help_heading = "Properties")]
    pub show_date: bool,
    /// Which date is displayed
    #[clap(long, value_enum, ignore_case = true, help_heading = "Properties")]
    pub date_type: Option<DateType>,
    /// strftime pattern for dates [default: "%Y%m%d%H%M%S"]
    #[clap(long, help_heading = "Properties")]
    pub date_format: Option<String>,
    /// Display a content hash for files
    #[clap(long, alias = "hash", help_heading = "Properties")]
    pub show_hash: bool,
    /// Mark hidden entries
    #[clap(long, help_heading = "Properties")]
    pub show_hidden: bool,
    /// Marker for hidden entries [default: "*"]
    #[clap(long, help_heading = "Properties")]
    pub hidden: Option<String>,
}

impl ListingArgs {
    /// Overlays the flags that were given onto `options`.
    pub fn apply(self, options: &mut Options) -> Result<(), ConfigError> {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        fn enable(target: &mut bool, flag: bool) {
            if flag {
                *target = true;
            }
        }

        enable(&mut options.rel_to_cwd, self.rel_to_cwd);
        enable(&mut options.append, self.append);
        set(&mut options.header, self.header);
        set(&mut options.footer, self.footer);

        set(&mut options.format_type, self.format_type);
        for (target, value) in [
            (&mut options.file_format, self.file_format),
            (&mut options.dir_format, self.dir_format),
            (&mut options.dir_close_format, self.dir_close_format),
            (&mut options.root_format, self.root_format),
            (&mut options.ellipsis_format, self.ellipsis_format),
        ] {
            if value.is_some() {
                *target = value;
            }
        }
        set(&mut options.start_level, self.start_level);
        set(&mut options.max_depth, self.max_depth);
        if self.no_indent {
            options.show_indent = false;
        }
        set(&mut options.indent, self.indent);
        enable(&mut options.show_ellipsis, self.show_ellipsis);
        set(&mut options.ellipsis, self.ellipsis);
        options.properties.extend(self.properties);

        if self.no_folders {
            options.show_folders = false;
        }
        if self.no_files {
            options.show_files = false;
        }
        enable(&mut options.filter_hidden, self.filter_hidden);
        if !self.exclude.is_empty() {
            options.filter = Some(ItemFilter::names(self.exclude));
        }
        set(&mut options.item_grouping, self.item_grouping);
        if self.ignore_case {
            options.sort_key = Some(NameKey::case_insensitive());
        }

        set(&mut options.name_type, self.name_type);
        set(&mut options.root_name_type, self.root_name_type);
        enable(&mut options.show_size, self.show_size);
        enable(&mut options.show_date, self.show_date);
        set(&mut options.date_type, self.date_type);
        set(&mut options.date_format, self.date_format);
        enable(&mut options.show_hash, self.show_hash);
        enable(&mut options.show_hidden, self.show_hidden);
        set(&mut options.hidden, self.hidden);

        validate_date_format(&options.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::apply_yaml;

    #[test]
    fn only_given_flags_override() {
        let mut options = Options::default();
        apply_yaml(&mut options, "show_size: true\nmax_depth: 4\nindent: \"\\t\"").unwrap();

        let args = ListingArgs {
            max_depth: Some(0),
            show_hash: true,
            file_format: Some("{relpath}\n".to_string()),
            ..ListingArgs::default()
        };
        args.apply(&mut options).unwrap();

        assert!(options.show_size);
        assert!(options.show_hash);
        assert_eq!(options.max_depth, 0);
        assert_eq!(options.indent, "\t");
        assert_eq!(options.file_format.as_deref(), Some("{relpath}\n"));
        assert_eq!(options.dir_format, None);
    }

    #[test]
    fn negative_flags_switch_toggles_off() {
        let mut options = Options::default();
        let args = ListingArgs {
            no_indent: true,
            no_folders: true,
            exclude: vec!["target".to_string()],
            ..ListingArgs::default()
        };
        args.apply(&mut options).unwrap();
        assert!(!options.show_indent);
        assert!(!options.show_folders);
        assert!(options.show_files);
        assert!(options.filter.is_some());
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let args = ListingArgs {
            date_format: Some("%Y-%".to_string()),
            ..ListingArgs::default()
        };
        assert!(matches!(
            args.apply(&mut Options::default()),
            Err(ConfigError::InvalidDateFormat { .. })
        ));
    }
}

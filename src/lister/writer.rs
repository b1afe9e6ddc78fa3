use std::io::Write;
use std::path::PathBuf;

use snafu::prelude::*;
use tracing::{debug, info};

use super::lister::WriteSnafu;
use crate::lister::{ListError, Lister};

impl Lister {
    /// Renders every folder in `folders` to `out`, one listing after the
    /// other between the configured header and footer.
    ///
    /// Returns the number of lines written.
    pub fn write_list(&self, folders: &[PathBuf], out: &mut impl Write) -> Result<usize, ListError> {
        let options = self.options();
        if !options.header.is_empty() {
            out.write_all(options.header.as_bytes()).context(WriteSnafu)?;
        }

        let mut lines = 0;
        for folder in folders {
            for record in self.walk(folder)? {
                let record = record?;
                let Some(template) = self.template(record.kind) else {
                    continue;
                };
                out.write_all(template.render(&record.props).as_bytes())
                    .context(WriteSnafu)?;
                lines += 1;
            }
            debug!("Listed {}", folder.display());
        }

        if !options.footer.is_empty() {
            out.write_all(options.footer.as_bytes()).context(WriteSnafu)?;
        }
        out.flush().context(WriteSnafu)?;
        info!("Wrote {} lines for {} folder(s)", lines, folders.len());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{FormatType, Options};
    use crate::lister::Lister;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "fn main() {}").unwrap();
        dir
    }

    fn render(options: Options, dir: &TempDir) -> String {
        let lister = Lister::new(options).unwrap();
        let mut out = Vec::new();
        lister.write_list(&[dir.path().to_path_buf()], &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_listing_with_header_and_footer() {
        let dir = sample_tree();
        let options = Options {
            header: "# files\n".to_string(),
            footer: "# end\n".to_string(),
            show_size: true,
            ..Options::default()
        };
        assert_eq!(
            render(options, &dir),
            "# files\n<.>\n notes.txt [5]\n <src>\n  main.rs [12]\n# end\n"
        );
    }

    #[test]
    fn xml_listing_closes_folders() {
        let dir = sample_tree();
        let options = Options {
            format_type: FormatType::Xml,
            indent: "\t".to_string(),
            ..Options::default()
        };
        assert_eq!(
            render(options, &dir),
            concat!(
                "<Folder>\n",
                "\t<File name=\"notes.txt\"/>\n",
                "\t<Folder name=\"src\">\n",
                "\t\t<File name=\"main.rs\"/>\n",
                "\t</Folder>\n",
                "</Folder>\n",
            )
        );
    }

    #[test]
    fn several_roots_follow_each_other() {
        let first = sample_tree();
        let second = TempDir::new().expect("Failed to create temp directory");
        fs::write(second.path().join("other.txt"), "").unwrap();

        let lister = Lister::new(Options::default()).unwrap();
        let mut out = Vec::new();
        let lines = lister
            .write_list(
                &[first.path().to_path_buf(), second.path().to_path_buf()],
                &mut out,
            )
            .unwrap();
        assert_eq!(lines, 6);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<.>\n notes.txt\n <src>\n  main.rs\n<.>\n other.txt\n"
        );
    }
}

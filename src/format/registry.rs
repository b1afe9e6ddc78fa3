use std::fmt;
use std::sync::Arc;

use hashlink::LinkedHashMap;

use crate::config::Options;
use crate::ext::SystemTimeExt;
use crate::filesystem::{PathItem, PathItemError};
use crate::format::date_to_pattern;

/// Computes the text of a property for one node.
pub type Extractor = Arc<dyn Fn(&PathItem, &Options) -> Result<String, PathItemError> + Send + Sync>;
/// Produces the regex fragment recognising a rendered property value.
pub type PatternFn = Arc<dyn Fn(&Options) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Property {
    extract: Extractor,
    pattern: PatternFn,
}

impl Property {
    pub fn extract(&self, item: &PathItem, options: &Options) -> Result<String, PathItemError> {
        (self.extract)(item, options)
    }

    pub fn pattern(&self, options: &Options) -> String {
        (self.pattern)(options)
    }
}

/// Named properties available to templates.
///
/// Templates look their placeholders up here when they are compiled, so
/// anything registered before that point can be used in a pattern.
#[derive(Clone)]
pub struct PropertyRegistry {
    properties: LinkedHashMap<String, Property>,
}

impl PropertyRegistry {
    pub fn empty() -> Self {
        Self {
            properties: LinkedHashMap::new(),
        }
    }

    pub fn with_core_properties() -> Self {
        let mut registry = Self::empty();
        registry
            .register(
                "indent",
                |item, options| Ok(options.indent.repeat(item.depth() + options.start_level)),
                |options| optional_repeat(&options.indent, "*"),
            )
            .register(
                "level",
                |item, options| Ok((item.depth() + options.start_level).to_string()),
                |_| r"\d+?".to_string(),
            )
            .register(
                "depth",
                |item, _| Ok(item.depth().to_string()),
                |_| r"\d+?".to_string(),
            )
            .register(
                "name",
                |item, _| Ok(item.name()),
                |_| r#"[^\\/:*?"<>|]+?"#.to_string(),
            )
            .register(
                "relpath",
                |item, _| Ok(item.path().to_string_lossy().into_owned()),
                |_| r#"[^*?"<>|]+?"#.to_string(),
            )
            .register(
                "abspath",
                |item, _| Ok(item.abspath().to_string_lossy().into_owned()),
                |_| r#"[^*?"<>|]+?"#.to_string(),
            )
            .register(
                "hidden",
                |item, options| {
                    Ok(if item.hidden()? {
                        options.hidden.clone()
                    } else {
                        String::new()
                    })
                },
                |options| optional_repeat(&options.hidden, "?"),
            )
            .register(
                "size",
                |item, _| Ok(item.size()?.to_string()),
                |_| r"\d+?".to_string(),
            )
            .register(
                "cdate",
                |item, options| format_date(item.changed()?, options),
                |options| date_to_pattern(&options.date_format),
            )
            .register(
                "mdate",
                |item, options| format_date(item.modified()?, options),
                |options| date_to_pattern(&options.date_format),
            )
            .register(
                "ndate",
                |item, options| format_date(item.changed()?.max(item.modified()?), options),
                |options| date_to_pattern(&options.date_format),
            )
            .register(
                "hash",
                |item, _| Ok(item.content_hash()?.to_string()),
                |_| "[0-9a-f]+".to_string(),
            );
        registry
    }

    /// Adds or replaces a property.
    pub fn register<E, P>(&mut self, name: impl Into<String>, extract: E, pattern: P) -> &mut Self
    where
        E: Fn(&PathItem, &Options) -> Result<String, PathItemError> + Send + Sync + 'static,
        P: Fn(&Options) -> String + Send + Sync + 'static,
    {
        self.properties.insert(
            name.into(),
            Property {
                extract: Arc::new(extract),
                pattern: Arc::new(pattern),
            },
        );
        self
    }

    /// Adds a property that renders the same text for every node.
    pub fn register_constant(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        pattern: impl Into<String>,
    ) -> &mut Self {
        let value = value.into();
        let pattern = pattern.into();
        self.register(name, move |_, _| Ok(value.clone()), move |_| pattern.clone())
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::with_core_properties()
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn optional_repeat(unit: &str, quantifier: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!("(?:{}){}", regex::escape(unit), quantifier)
    }
}

fn format_date(time: std::time::SystemTime, options: &Options) -> Result<String, PathItemError> {
    time.format_local(&options.date_format)
        .map_err(|source| PathItemError::DateFormatError {
            date_format: options.date_format.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn core_properties_are_registered() {
        let registry = PropertyRegistry::default();
        let names = registry.names().collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "indent", "level", "depth", "name", "relpath", "abspath", "hidden", "size", "cdate",
                "mdate", "ndate", "hash"
            ]
        );
    }

    #[test]
    fn extractors_read_the_node() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("file.txt"), "12345").unwrap();
        let item = PathItem::root(dir.path())
            .children(&Default::default())
            .remove(0)
            .children(&Default::default())
            .remove(0);

        let options = Options {
            indent: "--".to_string(),
            start_level: 1,
            ..Options::default()
        };
        let registry = PropertyRegistry::default();
        let value = |name: &str| registry.get(name).unwrap().extract(&item, &options).unwrap();

        assert_eq!(value("indent"), "------");
        assert_eq!(value("level"), "3");
        assert_eq!(value("depth"), "2");
        assert_eq!(value("name"), "file.txt");
        assert_eq!(value("relpath"), PathBuf::from("sub").join("file.txt").to_string_lossy());
        assert_eq!(value("size"), "5");
        assert_eq!(value("mdate").len(), 14);
    }

    #[test]
    fn registered_properties_extend_the_registry() {
        let mut registry = PropertyRegistry::empty();
        registry
            .register(
                "extension",
                |item, _| {
                    Ok(item
                        .path()
                        .extension()
                        .map(|ext| ext.to_string_lossy().into_owned())
                        .unwrap_or_default())
                },
                |_| r"\w*?".to_string(),
            )
            .register_constant("origin", "backup", "[a-z]+");

        let item = PathItem::detached("notes.md", 1, false);
        let options = Options::default();
        assert_eq!(registry.get("extension").unwrap().extract(&item, &options).unwrap(), "md");
        assert_eq!(registry.get("origin").unwrap().extract(&item, &options).unwrap(), "backup");
        assert_eq!(registry.get("origin").unwrap().pattern(&options), "[a-z]+");
        assert!(!registry.contains("name"));
    }
}

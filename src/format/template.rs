use std::fmt;
use std::sync::Arc;

use regex::Regex;
use snafu::prelude::*;

use crate::config::Options;
use crate::filesystem::{PathItem, PathItemError};
use crate::format::{Property, PropertyRegistry, Props};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A line pattern with `{property}` placeholders.
///
/// The same pattern renders nodes to text and, through a regex derived from
/// it, recognises rendered lines and recovers their property values.
/// `{{` and `}}` stand for literal braces.
#[derive(Clone)]
pub struct Template {
    pattern: String,
    segments: Vec<Segment>,
    /// Placeholder names in capture order.
    captures: Vec<String>,
    /// Every property computed for a node: placeholders first, then extras.
    properties: Vec<(String, Property)>,
    matcher: Regex,
    options: Arc<Options>,
}

impl Template {
    /// Compiles `pattern`. Every placeholder, and every extra property named
    /// in `options.properties`, must exist in `registry`.
    pub fn compile(
        pattern: &str,
        options: Arc<Options>,
        registry: &PropertyRegistry,
    ) -> Result<Self, TemplateError> {
        let segments = tokenize(pattern)?;
        let captures = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect::<Vec<_>>();

        let mut properties: Vec<(String, Property)> = Vec::new();
        for name in captures.iter().chain(options.properties.iter()) {
            if properties.iter().any(|(known, _)| known == name) {
                continue;
            }
            let property = registry.get(name).context(UnknownPropertySnafu {
                name: name.clone(),
                pattern,
            })?;
            properties.push((name.clone(), property.clone()));
        }

        let mut expression = String::from("^");
        let mut index = 0;
        for segment in &segments {
            match segment {
                Segment::Literal(text) => expression.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    let fragment = properties
                        .iter()
                        .find(|(known, _)| known == name)
                        .map(|(_, property)| property.pattern(&options))
                        .unwrap_or_else(|| ".*?".to_string());
                    expression.push_str(&format!("(?P<p{index}>{fragment})"));
                    index += 1;
                }
            }
        }
        expression.push('$');
        let matcher = Regex::new(&expression).context(InvalidPatternSnafu { pattern })?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            captures,
            properties,
            matcher,
            options,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of the properties computed for each node, in order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn placeholders(&self) -> &[String] {
        &self.captures
    }

    /// Extracts every declared property of `item`.
    pub fn props(&self, item: &PathItem) -> Result<Props, PathItemError> {
        let mut props = Props::new();
        for (name, property) in &self.properties {
            props.insert(name.clone(), property.extract(item, &self.options)?);
        }
        Ok(props)
    }

    /// Substitutes `props` into the pattern. Missing values render empty.
    pub fn render(&self, props: &Props) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Placeholder(name) => props.get(name).unwrap_or_default(),
            })
            .collect()
    }

    /// Renders `item` to a line.
    pub fn apply(&self, item: &PathItem) -> Result<String, PathItemError> {
        Ok(self.render(&self.props(item)?))
    }

    /// Recognises a whole line rendered by this template and returns the
    /// placeholder values; `None` when the line has a different shape.
    pub fn match_line(&self, line: &str) -> Option<Props> {
        let found = self.matcher.captures(line)?;
        let mut props = Props::new();
        for (index, name) in self.captures.iter().enumerate() {
            if props.contains(name) {
                continue;
            }
            let value = found
                .name(&format!("p{index}"))
                .map(|value| value.as_str())
                .unwrap_or_default();
            props.insert(name.clone(), value);
        }
        Some(props)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Template").field(&self.pattern).finish()
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return UnbalancedBraceSnafu { pattern }.fail(),
                        Some(c) => field.push(c),
                    }
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(placeholder_name(pattern, &field)?));
            }
            '}' => return UnbalancedBraceSnafu { pattern }.fail(),
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn placeholder_name(pattern: &str, field: &str) -> Result<String, TemplateError> {
    if field.contains([':', '!']) {
        return UnsupportedFormatSpecSnafu { field, pattern }.fail();
    }
    if field.is_empty() || field.chars().all(|c| c.is_ascii_digit()) {
        return PositionalPlaceholderSnafu { pattern }.fail();
    }
    Ok(field.to_string())
}

#[derive(Debug, Snafu)]
pub enum TemplateError {
    #[snafu(display("Unknown property '{}' in pattern {:?}", name, pattern))]
    UnknownProperty { name: String, pattern: String },
    #[snafu(display("Positional placeholders are not supported in pattern {:?}", pattern))]
    PositionalPlaceholder { pattern: String },
    #[snafu(display("Placeholder '{{{}}}' uses an unsupported format spec in pattern {:?}", field, pattern))]
    UnsupportedFormatSpec { field: String, pattern: String },
    #[snafu(display("Unbalanced brace in pattern {:?}", pattern))]
    UnbalancedBrace { pattern: String },
    #[snafu(display("Pattern {:?} does not produce a valid matcher", pattern))]
    InvalidPattern { pattern: String, source: regex::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::fs;
    use tempfile::TempDir;

    fn compile(pattern: &str) -> Template {
        compile_with(pattern, Options::default())
    }

    fn compile_with(pattern: &str, options: Options) -> Template {
        Template::compile(pattern, Arc::new(options), &PropertyRegistry::default()).unwrap()
    }

    #[rstest]
    #[case("{indent}{colour}\n", "colour")]
    #[case("{name}{attr.x}", "attr.x")]
    fn unknown_property_fails_at_compile_time(#[case] pattern: &str, #[case] unknown: &str) {
        let result = Template::compile(pattern, Arc::default(), &PropertyRegistry::default());
        assert!(matches!(result, Err(TemplateError::UnknownProperty { name, .. }) if name == unknown));
    }

    #[test]
    fn unknown_extra_property_fails_at_compile_time() {
        let options = Options {
            properties: vec!["weight".to_string()],
            ..Options::default()
        };
        let result = Template::compile("{name}", Arc::new(options), &PropertyRegistry::default());
        assert!(matches!(result, Err(TemplateError::UnknownProperty { .. })));
    }

    #[rstest]
    #[case("{}")]
    #[case("{0}")]
    fn positional_placeholders_are_rejected(#[case] pattern: &str) {
        let result = Template::compile(pattern, Arc::default(), &PropertyRegistry::default());
        assert!(matches!(result, Err(TemplateError::PositionalPlaceholder { .. })));
    }

    #[rstest]
    #[case("{name")]
    #[case("name}")]
    #[case("{na{me}")]
    fn unbalanced_braces_are_rejected(#[case] pattern: &str) {
        let result = Template::compile(pattern, Arc::default(), &PropertyRegistry::default());
        assert!(matches!(result, Err(TemplateError::UnbalancedBrace { .. })));
    }

    #[test]
    fn format_specs_are_rejected() {
        let result = Template::compile("{size:>8}", Arc::default(), &PropertyRegistry::default());
        assert!(matches!(result, Err(TemplateError::UnsupportedFormatSpec { .. })));
    }

    #[test]
    fn escaped_braces_are_literal() {
        let template = compile("{{{name}}}\n");
        let props: Props = [("name", "a.txt")].into_iter().collect();
        assert_eq!(template.render(&props), "{a.txt}\n");
        assert_eq!(template.match_line("{b.txt}\n").unwrap().get("name"), Some("b.txt"));
    }

    #[test]
    fn matching_is_anchored() {
        let template = compile("{indent}<{name}>\n");
        assert!(template.match_line("  <dir>\n").is_some());
        assert!(template.match_line("  <dir>\nextra").is_none());
        assert!(template.match_line("x  <dir>\n").is_none());
        assert!(template.match_line("  file.txt\n").is_none());
    }

    #[test]
    fn open_ended_properties_do_not_swallow_trailing_text() {
        let template = compile("{relpath} [{size}]\n");
        let props = template.match_line("some dir/file [x].txt [42]\n").unwrap();
        assert_eq!(props.get("relpath"), Some("some dir/file [x].txt"));
        assert_eq!(props.get("size"), Some("42"));
    }

    #[test]
    fn name_excludes_separators() {
        let template = compile("{indent}{name}\n");
        assert!(template.match_line(" a/b\n").is_none());
        assert_eq!(template.match_line("  a.b\n").unwrap().get("indent"), Some("  "));
    }

    #[test]
    fn hidden_marker_is_optional() {
        let template = compile("{name}{hidden} [{size}]\n");
        let hidden = template.match_line(".profile* [3]\n").unwrap();
        assert_eq!(hidden.get("name"), Some(".profile"));
        assert_eq!(hidden.get("hidden"), Some("*"));
        let visible = template.match_line("notes [3]\n").unwrap();
        assert_eq!(visible.get("hidden"), Some(""));
    }

    #[test]
    fn extra_properties_are_extracted_but_not_rendered() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("data.bin"), "payload").unwrap();
        let options = Options {
            properties: vec!["size".to_string(), "name".to_string()],
            ..Options::default()
        };
        let template = compile_with("{indent}{name}\n", options);
        assert_eq!(template.properties().collect::<Vec<_>>(), vec!["indent", "name", "size"]);

        let item = PathItem::root(dir.path()).children(&Default::default()).remove(0);
        let props = template.props(&item).unwrap();
        assert_eq!(props.get("size"), Some("7"));
        assert_eq!(template.render(&props), " data.bin\n");
    }

    #[rstest]
    #[case("{indent}{name} [{size},{mdate},{hash}]\n")]
    #[case("{indent}<File name=\"{name}\" size=\"{size}\" cdate=\"{cdate}\" hash=\"{hash}\"/>\n")]
    #[case("{level}|{depth}|{relpath}|{ndate}\n")]
    fn rendered_lines_parse_back_to_the_same_props(#[case] pattern: &str) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("nested dir")).unwrap();
        fs::write(dir.path().join("nested dir").join("report [final].txt"), "content").unwrap();
        let ordering = Default::default();
        let item = PathItem::root(dir.path()).children(&ordering).remove(0).children(&ordering).remove(0);

        let options = Options {
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            ..Options::default()
        };
        let template = compile_with(pattern, options);
        let props = template.props(&item).unwrap();
        let line = template.render(&props);

        assert_eq!(template.match_line(&line), Some(props.clone()));
        assert_eq!(template.render(&template.match_line(&line).unwrap()), line);
    }
}

//! Prompt templates with named placeholders.

use std::collections::BTreeSet;
use std::path::Path;

use lifebook_error::{GenerationError, GenerationErrorKind, LifebookResult};
use lifebook_interface::PromptInputs;
use tracing::debug;

/// Bundled chapter template. Inputs: `chapter_title`, `context_summary`,
/// `facts_bullets`, `style_guide`.
pub const CHAPTER_TEMPLATE: &str = include_str!("../prompts/chapter.md");

/// Bundled summary template. Input: `narrative`.
pub const SUMMARY_TEMPLATE: &str = include_str!("../prompts/summary.md");

/// Bundled compile template. Inputs: `style_guide`, `chapter_summaries`,
/// `timeline`.
pub const COMPILE_TEMPLATE: &str = include_str!("../prompts/compile.md");

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A prompt template with `{name}` placeholders.
///
/// `{{` and `}}` render as literal braces. Rendering fails if any
/// placeholder has no matching input; extra inputs are ignored.
///
/// # Examples
///
/// ```
/// use lifebook_interface::PromptInputs;
/// use lifebook_narrative::PromptTemplate;
///
/// let template = PromptTemplate::parse("greeting", "Hello, {name}! {{literal}}").unwrap();
/// let text = template.render(&PromptInputs::new().with("name", "Ada")).unwrap();
/// assert_eq!(text, "Hello, Ada! {literal}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template source.
    ///
    /// Surrounding whitespace is trimmed, matching how prompt files are
    /// usually saved with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns a template error for an unclosed `{`, a stray `}` or an
    /// empty placeholder name.
    pub fn parse(name: impl Into<String>, source: &str) -> LifebookResult<Self> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.trim().chars().peekable();

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
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => key.push(ch),
                            None => {
                                return Err(template_error(format!(
                                    "{}: unclosed placeholder '{{{}'",
                                    name, key
                                )));
                            }
                        }
                    }
                    let key = key.trim().to_string();
                    if key.is_empty() {
                        return Err(template_error(format!("{}: empty placeholder", name)));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(key));
                }
                '}' => {
                    return Err(template_error(format!(
                        "{}: unmatched '}}' (use '}}}}' for a literal brace)",
                        name
                    )));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { name, segments })
    }

    /// Load and parse a template file.
    ///
    /// # Errors
    ///
    /// Returns a template error if the file cannot be read or parsed.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> LifebookResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            template_error(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded prompt template");
        Self::parse(name, &source)
    }

    /// Template name used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder names, sorted.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(key) => Some(key.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitute `inputs` into the template.
    ///
    /// # Errors
    ///
    /// Returns a template error naming the first placeholder with no input.
    pub fn render(&self, inputs: &PromptInputs) -> LifebookResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    let value = inputs.get(key).ok_or_else(|| {
                        template_error(format!("{}: missing input '{}'", self.name, key))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

#[track_caller]
fn template_error(message: String) -> lifebook_error::LifebookError {
    GenerationError::new(GenerationErrorKind::Template(message)).into()
}

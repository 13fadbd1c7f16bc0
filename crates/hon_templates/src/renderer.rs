//! Placeholder substitution for template strings.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::error::{TemplateError, TemplateResult};

/// Renders `{key}` placeholders in a string.
///
/// `{{` and `}}` produce literal braces. Braces that do not form a
/// placeholder are copied through unchanged.
pub struct TemplateRenderer {
    pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_.]*)\}")
                .expect("placeholder pattern is valid"),
        }
    }

    /// Substitute every placeholder in `template`.
    ///
    /// `origin` names the template in error messages.
    pub fn render(
        &self,
        template: &str,
        values: &HashMap<String, String>,
        origin: &str,
    ) -> TemplateResult<String> {
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(template) {
            let whole = caps.get(0).expect("capture group 0 always matches");
            rendered.push_str(&template[last..whole.start()]);
            rendered.push_str(self.replacement(&caps, values, origin)?);
            last = whole.end();
        }
        rendered.push_str(&template[last..]);

        Ok(rendered)
    }

    fn replacement<'a>(
        &self,
        caps: &'a Captures<'_>,
        values: &'a HashMap<String, String>,
        origin: &str,
    ) -> TemplateResult<&'a str> {
        match caps.get(1) {
            Some(key) => values.get(key.as_str()).map(String::as_str).ok_or_else(|| {
                TemplateError::MissingSubstitutionKey {
                    key: key.as_str().to_string(),
                    template: origin.to_string(),
                }
            }),
            None if &caps[0] == "{{" => Ok("{"),
            None => Ok("}"),
        }
    }

    /// List the placeholder keys referenced by `template`, in order of first use.
    pub fn placeholders(&self, template: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for caps in self.pattern.captures_iter(template) {
            if let Some(key) = caps.get(1) {
                if !keys.iter().any(|k| k == key.as_str()) {
                    keys.push(key.as_str().to_string());
                }
            }
        }
        keys
    }
}

//! # Formatters
//!
//! Turns one extracted value into the message shown to the user: either a
//! caller-supplied transform, or the configured template.

use crate::configs::NAME_TEMPLATE;

/// Caller-supplied message builder; its output is used verbatim.
pub type Transform = Box<dyn Fn(&str) -> String>;

/// Template-based formatter. The template holds one `{}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
}

impl Formatter {
    /// Formatter using `template`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The default template in use.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Formats `value` with `transform` if given, else with the template.
    pub fn format(&self, value: &str, transform: Option<&dyn Fn(&str) -> String>) -> String {
        match transform {
            Some(transform) => transform(value),
            None => self.template.replacen("{}", value, 1),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(NAME_TEMPLATE)
    }
}

/// Formats with the default `"Common name: {}"` template or `transform`.
pub fn get_formatted_fish(value: &str, transform: Option<&dyn Fn(&str) -> String>) -> String {
    Formatter::default().format(value, transform)
}

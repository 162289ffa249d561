//! Sender inference for credit rows.

use trantrac_shared::ImportConfig;

/// Descriptions containing `pattern` are attributed to `label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderRule {
    /// Case-sensitive substring.
    pub pattern: String,
    /// Display name written to the sheet.
    pub label: String,
}

impl SenderRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Ordered rule table; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct SenderDirectory {
    rules: Vec<SenderRule>,
    fallback: String,
}

impl SenderDirectory {
    /// Creates a directory from rules and the label used when none match.
    #[must_use]
    pub fn new(rules: Vec<SenderRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Builds the directory from the `import` configuration section.
    #[must_use]
    pub fn from_config(config: &ImportConfig) -> Self {
        let rules = config
            .sender_rules
            .iter()
            .map(|rule| SenderRule::new(&rule.pattern, &rule.label))
            .collect();
        Self::new(rules, &config.fallback_sender)
    }

    /// Returns the sender label for a credit description.
    #[must_use]
    pub fn resolve(&self, description: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| description.contains(&rule.pattern))
            .map_or(self.fallback.as_str(), |rule| rule.label.as_str())
    }
}

impl Default for SenderDirectory {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

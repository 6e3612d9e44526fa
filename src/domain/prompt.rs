use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A prompt with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fails if any of `required` has no placeholder in the template.
    pub fn validate(&self, required: &[&str]) -> Result<(), DomainError> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !self.0.contains(&format!("{{{name}}}")))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::configuration(format!(
                "prompt template is missing placeholders: {}",
                missing.join(", ")
            )))
        }
    }

    /// Substitutes every `{name}` with its value in a single pass, so values
    /// are never re-expanded. Unknown placeholders are left as-is.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            let value = tail.find('}').and_then(|end| {
                let name = &tail[1..end];
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, end))
            });

            match value {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl From<&str> for PromptTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::SetupError;

const PLACEHOLDER: &str = r"\{([A-Za-z][A-Za-z0-9_]*)\}";

/// Values substituted into a [`ResourceTemplate`], keyed by placeholder name.
///
/// The core attaches no meaning to them; `ContainerId`, `TemplateId` and the
/// like are just strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Relative REST path with `{Name}` placeholders, e.g.
/// `cost/v1/containers/{ContainerId}/templates/{TemplateId}/segments`.
#[derive(Debug, Clone)]
pub struct ResourceTemplate {
    raw: String,
    pattern: Regex,
    placeholders: Vec<String>,
}

impl ResourceTemplate {
    pub fn new(raw: impl Into<String>) -> Result<Self, SetupError> {
        let raw = raw.into();
        let pattern = Regex::new(PLACEHOLDER)
            .map_err(|e| SetupError::InvalidTemplate(e.to_string()))?;

        let stripped = pattern.replace_all(&raw, "");
        if stripped.contains('{') || stripped.contains('}') {
            return Err(SetupError::InvalidTemplate(format!(
                "malformed placeholder in '{raw}'"
            )));
        }

        let placeholders = pattern
            .captures_iter(&raw)
            .map(|caps| caps[1].to_string())
            .collect();

        Ok(Self {
            raw,
            pattern,
            placeholders,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute every placeholder, percent-encoding each value.
    pub fn render(&self, params: &PathParams) -> Result<String, SetupError> {
        if let Some(missing) = self
            .placeholders
            .iter()
            .find(|name| params.get(name).is_none())
        {
            return Err(SetupError::InvalidTemplate(format!(
                "no value for {{{missing}}} in '{}'",
                self.raw
            )));
        }

        let rendered = self.pattern.replace_all(&self.raw, |caps: &regex::Captures<'_>| {
            let value = params.get(&caps[1]).unwrap_or_default();
            urlencoding::encode(value).into_owned()
        });
        Ok(rendered.into_owned())
    }
}

impl FromStr for ResourceTemplate {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ResourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

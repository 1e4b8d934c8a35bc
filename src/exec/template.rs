// src/exec/template.rs

//! `{placeholder}` command templates.
//!
//! Tool command lines in the pipeline file are plain strings with named
//! slots. Values are inserted verbatim; quoting is up to the template.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// One set of named values used to render a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }
}

/// Names of all placeholders used by a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect()
}

/// Placeholders in `template` that are not in `allowed`.
pub fn unknown_placeholders(template: &str, allowed: &[&str]) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|p| !allowed.contains(&p.as_str()))
        .collect()
}

/// Replace every placeholder in `template` with its value from `params`.
///
/// A placeholder with no value is an error.
pub fn render(template: &str, params: &Params) -> Result<String> {
    let missing: Vec<String> = placeholders(template)
        .into_iter()
        .filter(|p| params.get(p).is_none())
        .collect();
    if !missing.is_empty() {
        bail!("template `{template}` has no value for {}", missing.join(", "));
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &regex::Captures<'_>| {
        params.get(&caps[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}

// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.
//!
//! Unknown keys get a Jaro-Winkler suggestion and, when the key came from a
//! TOML file, a labelled source span. Type errors name the `TAGSWIPE_*`
//! environment variable that overrides the key, and never echo the value of
//! a secret such as `tmdb.api_key`.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Keys whose values must not appear in diagnostics.
const SECRET_KEYS: &[&str] = &["tmdb.api_key"];

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(tagswipe::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key in the same section.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(tagswipe::config::invalid_type),
        help("expected {expected}; the key can also be set with `{env_var}`")
    )]
    InvalidType {
        /// Dotted path, e.g. `queue.low_water_mark`.
        key: String,
        detail: String,
        expected: String,
        /// Environment variable that overrides this key.
        env_var: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(tagswipe::config::missing_key),
        help("add `{key} = <value>` to your tagswipe.toml")
    )]
    MissingKey { key: String },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(tagswipe::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(tagswipe::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// The `TAGSWIPE_*` variable the loader maps onto `path`.
pub fn env_var_for(path: &[String]) -> String {
    format!("TAGSWIPE_{}", path.join("_").to_ascii_uppercase())
}

/// Type-mismatch detail for `key`, without the offending value for secrets.
fn invalid_type_detail(key: &str, actual: &str, expected: &str) -> String {
    if SECRET_KEYS.contains(&key) {
        format!("expected {expected}")
    } else {
        format!("found {actual}, expected {expected}")
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();
    for error in err {
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = find_source_span(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                let key = error.path.join(".");
                ConfigError::InvalidType {
                    detail: invalid_type_detail(&key, &actual.to_string(), expected),
                    expected: expected.to_string(),
                    env_var: env_var_for(&error.path),
                    key,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        };
        errors.push(config_error);
    }
    errors
}

fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = source_path
        .as_ref()
        .and_then(|path| toml_sources.iter().find(|(p, _)| p == path));

    if let Some((path, content)) = source {
        if let Some(offset) = find_key_offset(content, &error.path, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            return (Some(span), Some(NamedSource::new(path, content.clone())));
        }
    }

    (None, None)
}

/// Byte offset of `field` inside the `[section]` named by `path[0]`.
///
/// Top-level fields are searched from the start of the document.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
        None => 0,
    };

    let mut byte_offset = 0;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.starts_with([' ', '=', '\t']) {
                return Some(search_start + byte_offset + (line.len() - trimmed.len()));
            }
        }
        byte_offset += line.len();
    }

    None
}

/// Best Jaro-Winkler match above the threshold, if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Render config errors to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_low_water_mark_for_typo() {
        let valid = &["low_water_mark", "max_pages_per_refill"];
        assert_eq!(
            suggest_key("low_watermark", valid),
            Some("low_water_mark".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["api_key", "base_url", "language"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[general]\nlog_level = \"info\"\n[queue]\nlow_watermark = 4\n";
        let path = vec!["queue".to_string()];
        let o = find_key_offset(content, &path, "low_watermark").unwrap();
        assert_eq!(&content[o..o + "low_watermark".len()], "low_watermark");
    }

    #[test]
    fn env_var_matches_loader_mapping() {
        let path = vec!["queue".to_string(), "low_water_mark".to_string()];
        assert_eq!(env_var_for(&path), "TAGSWIPE_QUEUE_LOW_WATER_MARK");
    }

    #[test]
    fn secret_values_are_not_echoed() {
        let detail = invalid_type_detail("tmdb.api_key", "integer 1234", "a string");
        assert_eq!(detail, "expected a string");
        let detail = invalid_type_detail("queue.low_water_mark", "string \"x\"", "usize");
        assert!(detail.contains("string \"x\""));
    }

    #[test]
    fn invalid_type_names_the_env_override() {
        let toml = "[queue]\nlow_water_mark = \"lots\"\n";
        let err = crate::load_and_validate_str(toml).unwrap_err();
        assert!(err.iter().any(|e| matches!(
            e,
            ConfigError::InvalidType { key, env_var, .. }
                if key == "queue.low_water_mark" && env_var == "TAGSWIPE_QUEUE_LOW_WATER_MARK"
        )));
    }

    #[test]
    fn find_key_offset_requires_separator() {
        let content = "[tmdb]\napi_keyring = 1\n";
        let path = vec!["tmdb".to_string()];
        assert_eq!(find_key_offset(content, &path, "api_key"), None);
    }
}

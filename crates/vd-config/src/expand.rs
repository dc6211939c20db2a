//! Environment variable expansion for option strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::convert::Infallible;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// `${VAR}` references without a default.
static REQUIRED_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Expand `${...}` references in one option value.
///
/// Bare `$VAR` is left as is.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(missing) = REQUIRED_VAR_RE
        .captures_iter(value)
        .filter_map(|c| c.get(1))
        .find(|var| std::env::var_os(var.as_str()).is_none())
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", missing.as_str()),
        });
    }

    // Unset variables here all carry a default, which shellexpand applies on `None`.
    let expanded = shellexpand::env_with_context(value, |var| {
        Ok::<_, Infallible>(std::env::var(var).ok())
    })
    .map_err(|e| -> ConfigError { match e.cause {} })?;

    Ok(expanded.into_owned())
}

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Width of every alias, in characters.
pub const ALIAS_LEN: usize = 6;

/// A validated short alias for a long URL.
///
/// Aliases are exactly [`ALIAS_LEN`] characters long and contain only
/// characters that are safe in a URL path segment: ASCII letters, digits,
/// hyphens and underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    /// Creates a new `Alias` after validating the input.
    pub fn new(alias: impl Into<String>) -> Result<Self, CoreError> {
        let alias = alias.into();
        Self::validate(&alias)?;
        Ok(Self(alias))
    }

    /// Creates an `Alias` without validation.
    ///
    /// Use this only for aliases produced by trusted internal sources
    /// (e.g. the alias slicer, whose output is valid by construction).
    pub fn new_unchecked(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// Returns the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(alias: &str) -> Result<(), CoreError> {
        if alias.len() != ALIAS_LEN {
            return Err(CoreError::InvalidAlias(format!(
                "length must be {}, got {}",
                ALIAS_LEN,
                alias.len()
            )));
        }

        if !alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidAlias(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                alias
            )));
        }

        Ok(())
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Alias {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Alias {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Alias::new(s).map_err(serde::de::Error::custom)
    }
}

//! Decoded `application/x-www-form-urlencoded` request fields.

use std::collections::HashMap;

/// Submitted form fields. Missing fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, or `""` when the field was not submitted.
    pub fn get(&self, name: &str) -> &str {
        self.raw(name).unwrap_or("")
    }

    /// Value of `name`, distinguishing a missing field from an empty one.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for FormFields {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

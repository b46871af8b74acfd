use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier (e.g. "households.write").
///
/// `"*"` is the wildcard granted to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const HOUSEHOLDS_WRITE: &'static str = "households.write";
    pub const CITIZENS_WRITE: &'static str = "citizens.write";
    pub const CHANGE_RECORDS_WRITE: &'static str = "change_records.write";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

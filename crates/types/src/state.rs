use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque token naming a point-in-time view of validator state.
///
/// Beacon nodes accept `head`, `genesis`, `finalized`, `justified`, a slot
/// number or a `0x`-prefixed state root. The value is passed through to the
/// node untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn head() -> Self {
        Self::new("head")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::head()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StateId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

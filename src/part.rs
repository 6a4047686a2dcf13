use std::fmt;

/// Name of a displayed part: a train node, or one of its wheels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sub-part of this part, e.g. `center/pinion`.
    pub fn child(&self, name: &str) -> PartId {
        PartId(format!("{}/{}", self.0, name))
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for PartId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

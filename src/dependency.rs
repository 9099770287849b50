use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Relationship between a predecessor and a successor.
///
/// The passes treat every kind as finish-to-start; the kind only travels
/// along for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationshipKind {
    #[default]
    #[serde(rename = "FS", alias = "PR_FS")]
    FinishToStart,
    #[serde(rename = "SS", alias = "PR_SS")]
    StartToStart,
    #[serde(rename = "FF", alias = "PR_FF")]
    FinishToFinish,
    #[serde(rename = "SF", alias = "PR_SF")]
    StartToFinish,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::FinishToStart => "FS",
            RelationshipKind::StartToStart => "SS",
            RelationshipKind::FinishToFinish => "FF",
            RelationshipKind::StartToFinish => "SF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relationship kind '{0}'")]
pub struct ParseRelationshipKindError(pub String);

/// Accepts `FS`/`SS`/`FF`/`SF` as well as the P6 `PR_` spellings.
impl FromStr for RelationshipKind {
    type Err = ParseRelationshipKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let code = trimmed.strip_prefix("PR_").unwrap_or(trimmed);
        match code.to_ascii_uppercase().as_str() {
            "FS" => Ok(RelationshipKind::FinishToStart),
            "SS" => Ok(RelationshipKind::StartToStart),
            "FF" => Ok(RelationshipKind::FinishToFinish),
            "SF" => Ok(RelationshipKind::StartToFinish),
            _ => Err(ParseRelationshipKindError(value.to_string())),
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub predecessor: String,
    pub successor: String,
    #[serde(default)]
    pub kind: RelationshipKind,
    /// Positive delays the successor, negative allows a lead.
    #[serde(default)]
    pub lag_hours: f64,
}

impl Dependency {
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
            kind: RelationshipKind::FinishToStart,
            lag_hours: 0.0,
        }
    }

    pub fn with_lag(mut self, lag_hours: f64) -> Self {
        self.lag_hours = lag_hours;
        self
    }

    pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_codes() {
        assert_eq!("FS".parse::<RelationshipKind>(), Ok(RelationshipKind::FinishToStart));
        assert_eq!("PR_SS".parse::<RelationshipKind>(), Ok(RelationshipKind::StartToStart));
        assert_eq!(" ff ".parse::<RelationshipKind>(), Ok(RelationshipKind::FinishToFinish));
        assert_eq!("PR_SF".parse::<RelationshipKind>(), Ok(RelationshipKind::StartToFinish));
        assert_eq!(
            "XX".parse::<RelationshipKind>(),
            Err(ParseRelationshipKindError("XX".into()))
        );
    }

    #[test]
    fn serde_accepts_p6_alias() {
        let dep: Dependency =
            serde_json::from_str(r#"{"predecessor":"A","successor":"B","kind":"PR_FF","lag_hours":4.0}"#)
                .unwrap();
        assert_eq!(dep.kind, RelationshipKind::FinishToFinish);
        assert_eq!(dep.lag_hours, 4.0);
        assert_eq!(serde_json::to_value(dep.kind).unwrap(), "FF");
    }
}

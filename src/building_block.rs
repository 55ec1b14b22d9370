//! Building-block kinds.
//!
//! A project groups its reusable building blocks into one collection per
//! kind. The kind is what a swap request and a simulation reference use to
//! pick the collection; the name then picks the entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of building blocks.
///
/// Documents may spell the kind in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BuildingBlockType {
    /// A single virtual subject
    Individual,
    /// A set of virtual subjects
    Population,
    /// A compound and its properties
    Compound,
    /// A drug formulation
    Formulation,
    /// An administration protocol
    Protocol,
    /// A physiological event (meal, surgery, ...)
    Event,
    /// A set of custom observers
    ObserverSet,
    /// An expression profile for a molecule
    ExpressionProfile,
}

impl BuildingBlockType {
    /// All building-block kinds, in project-document order.
    pub const ALL: [Self; 8] = [
        Self::Individual,
        Self::Population,
        Self::Compound,
        Self::Formulation,
        Self::Protocol,
        Self::Event,
        Self::ObserverSet,
        Self::ExpressionProfile,
    ];

    /// Returns the name of the kind as it appears in documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Population => "Population",
            Self::Compound => "Compound",
            Self::Formulation => "Formulation",
            Self::Protocol => "Protocol",
            Self::Event => "Event",
            Self::ObserverSet => "ObserverSet",
            Self::ExpressionProfile => "ExpressionProfile",
        }
    }
}

impl fmt::Display for BuildingBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown building-block kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown building block type: {0}")]
pub struct UnknownBuildingBlockType(pub String);

impl FromStr for BuildingBlockType {
    type Err = UnknownBuildingBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBuildingBlockType(s.to_string()))
    }
}

impl TryFrom<String> for BuildingBlockType {
    type Error = UnknownBuildingBlockType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_document_name() {
        assert_eq!(BuildingBlockType::ObserverSet.to_string(), "ObserverSet");
        let json = serde_json::to_string(&BuildingBlockType::Individual).unwrap();
        assert_eq!(json, "\"Individual\"");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "individual".parse::<BuildingBlockType>().unwrap(),
            BuildingBlockType::Individual
        );
        assert_eq!(
            " Formulation ".parse::<BuildingBlockType>().unwrap(),
            BuildingBlockType::Formulation
        );
    }

    #[test]
    fn test_deserialize_accepts_any_case() {
        let kinds: Vec<BuildingBlockType> =
            serde_json::from_str(r#"["individual", "OBSERVERSET", "Compound"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                BuildingBlockType::Individual,
                BuildingBlockType::ObserverSet,
                BuildingBlockType::Compound
            ]
        );

        let err = serde_json::from_str::<BuildingBlockType>(r#""Organism""#).unwrap_err();
        assert!(err.to_string().contains("Organism"));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "Organism".parse::<BuildingBlockType>().unwrap_err();
        assert!(err.to_string().contains("Organism"));
    }
}

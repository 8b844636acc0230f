//! Damage attributes, role archetypes, and the attribute advantage chart.

use crate::config::CombatConfig;

/// Damage-type tag carried by every unit and projectile.
///
/// Advantage graph:
/// - directed 3-cycle `bio → psychic → machine → bio`
/// - mutual pair `corrosion ↔ immunity` (each advantaged against the other)
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    Bio,
    Psychic,
    Machine,
    Corrosion,
    Immunity,
}

impl Attribute {
    /// Parses a tag, treating empty or unknown tags as "no attribute".
    pub fn parse_lenient(tag: &str) -> Option<Self> {
        tag.trim().parse().ok()
    }

    /// The attribute this one is advantaged against.
    pub const fn strong_against(self) -> Attribute {
        match self {
            Self::Bio => Self::Psychic,
            Self::Psychic => Self::Machine,
            Self::Machine => Self::Bio,
            Self::Corrosion => Self::Immunity,
            Self::Immunity => Self::Corrosion,
        }
    }

    /// The attribute this one is disadvantaged against, if any.
    ///
    /// The mutual pair has no weakness: both directions are advantaged.
    pub const fn weak_against(self) -> Option<Attribute> {
        match self {
            Self::Bio => Some(Self::Machine),
            Self::Psychic => Some(Self::Bio),
            Self::Machine => Some(Self::Psychic),
            Self::Corrosion | Self::Immunity => None,
        }
    }
}

/// Role tag conferring passive bonuses and selecting skill behavior.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    #[default]
    Dps,
    Support,
    Tank,
    Medic,
    Breaker,
}

/// Damage multiplier for an attacker attribute against a defender attribute.
///
/// Returns the advantage multiplier (1.3) along a cycle edge and for both
/// directions of the mutual pair, the disadvantage multiplier (0.7) along a
/// reversed cycle edge, and 1.0 otherwise (including missing attributes).
pub fn attribute_multiplier(
    attacker: Option<Attribute>,
    defender: Option<Attribute>,
    config: &CombatConfig,
) -> f32 {
    let (Some(attacker), Some(defender)) = (attacker, defender) else {
        return 1.0;
    };

    if attacker.strong_against() == defender {
        config.advantage_multiplier
    } else if attacker.weak_against() == Some(defender) {
        config.disadvantage_multiplier
    } else {
        1.0
    }
}

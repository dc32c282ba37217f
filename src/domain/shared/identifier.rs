// src/domain/shared/identifier.rs
//
// Typed identifiers. Each aggregate gets its own newtype over a UUID so that a
// GenreId can never be handed to a repository expecting a CategoryId.

use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

use crate::domain::InvalidIdentifier;

/// Behaviour shared by every typed identifier
pub trait EntityId: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Name of the aggregate this id belongs to, used in error messages
    const ENTITY: &'static str;

    fn from_uuid(uuid: Uuid) -> Self;

    fn as_uuid(&self) -> Uuid;

    /// Parse the canonical string form, rejecting anything that is not a UUID
    fn parse_str(value: &str) -> Result<Self, InvalidIdentifier> {
        Uuid::parse_str(value.trim())
            .map(Self::from_uuid)
            .map_err(|_| InvalidIdentifier::new(value, Self::ENTITY))
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn parse(value: &str) -> Result<Self, $crate::domain::InvalidIdentifier> {
                <Self as $crate::domain::shared::identifier::EntityId>::parse_str(value)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::domain::shared::identifier::EntityId for $name {
            const ENTITY: &'static str = $entity;

            fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::InvalidIdentifier;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }
    };
}

pub(crate) use entity_id;

/// Parse a batch of raw ids, stopping at the first malformed one
pub fn parse_ids<I: EntityId>(raw_ids: &[String]) -> Result<Vec<I>, InvalidIdentifier> {
    raw_ids.iter().map(|raw| I::parse_str(raw)).collect()
}

//! Critical CastMember Invariants:
//!
//! 1. Name is required and at most 255 characters
//! 2. Type is one of the known kinds (director, actor)
//! 3. An unknown type is reported as a `type` field error, alongside any
//!    name error, never on its own

pub mod entity;
#[cfg(test)]
pub mod fake;
pub mod invariants;

pub use entity::{
    CastMember, CastMemberCreateCommand, CastMemberFilter, CastMemberId, CastMemberType,
    InvalidCastMemberType,
};
pub use invariants::{validate_cast_member, CastMemberValidator};

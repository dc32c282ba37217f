use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::invariants::validate_cast_member;
use crate::domain::shared::identifier::entity_id;
use crate::domain::shared::{
    contains_ignore_case, AggregateRoot, Either, Entity, Notification, Searchable, SortDirection,
    SortValue,
};
use crate::error::AppResult;

entity_id!(
    /// Identity of a CastMember
    CastMemberId,
    "CastMember"
);

/// Role of a cast member; stored as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CastMemberType {
    Director = 1,
    #[default]
    Actor = 2,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid cast member type: {0}")]
pub struct InvalidCastMemberType(pub i32);

impl CastMemberType {
    pub fn create(value: i32) -> Either<CastMemberType, InvalidCastMemberType> {
        match value {
            1 => Either::ok(CastMemberType::Director),
            2 => Either::ok(CastMemberType::Actor),
            other => Either::fail(InvalidCastMemberType(other)),
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<CastMemberType> for i32 {
    fn from(value: CastMemberType) -> Self {
        value.code()
    }
}

impl TryFrom<i32> for CastMemberType {
    type Error = InvalidCastMemberType;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        CastMemberType::create(value).into_result()
    }
}

impl std::fmt::Display for CastMemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastMemberType::Director => write!(f, "director"),
            CastMemberType::Actor => write!(f, "actor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastMember {
    pub cast_member_id: CastMemberId,
    pub name: String,
    #[serde(rename = "type")]
    pub cast_member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    notification: Notification,
}

#[derive(Debug, Clone, Default)]
pub struct CastMemberCreateCommand {
    pub name: String,
    pub cast_member_type: CastMemberType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastMemberFilter {
    pub name: Option<String>,
    pub cast_member_type: Option<CastMemberType>,
}

impl CastMember {
    pub fn restore(
        cast_member_id: CastMemberId,
        name: String,
        cast_member_type: CastMemberType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            cast_member_id,
            name,
            cast_member_type,
            created_at,
            notification: Notification::new(),
        }
    }

    pub fn draft(command: CastMemberCreateCommand) -> Self {
        let mut cast_member = Self::restore(
            CastMemberId::new(),
            command.name,
            command.cast_member_type,
            Utc::now(),
        );
        cast_member.validate(None);
        cast_member
    }

    pub fn create(command: CastMemberCreateCommand) -> AppResult<Self> {
        let cast_member = Self::draft(command);
        cast_member.ensure_valid()?;
        Ok(cast_member)
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"][..]));
    }

    pub fn change_type(&mut self, cast_member_type: CastMemberType) {
        self.cast_member_type = cast_member_type;
    }

    pub fn validate(&mut self, fields: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(&mut self.notification);
        let valid = validate_cast_member(&mut notification, self, fields);
        self.notification = notification;
        valid
    }
}

impl Entity for CastMember {
    type Id = CastMemberId;

    fn id(&self) -> CastMemberId {
        self.cast_member_id
    }
}

impl AggregateRoot for CastMember {
    fn aggregate_id(&self) -> String {
        self.cast_member_id.to_string()
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }
}

impl Searchable for CastMember {
    type Filter = CastMemberFilter;

    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name.clone())),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }

    fn matches(&self, filter: &CastMemberFilter) -> bool {
        let name_matches = filter
            .name
            .as_deref()
            .map_or(true, |name| contains_ignore_case(&self.name, name));
        let type_matches = filter
            .cast_member_type
            .map_or(true, |kind| kind == self.cast_member_type);
        name_matches && type_matches
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }
}

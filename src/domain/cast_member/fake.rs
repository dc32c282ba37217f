// Test data builder for CastMember

use chrono::{DateTime, Duration, Utc};

use super::entity::{CastMember, CastMemberId, CastMemberType};

pub struct CastMemberFakeBuilder {
    cast_member_id: Option<CastMemberId>,
    name: String,
    cast_member_type: CastMemberType,
    created_at: Option<DateTime<Utc>>,
}

impl CastMember {
    pub fn fake() -> CastMemberFakeBuilder {
        CastMemberFakeBuilder {
            cast_member_id: None,
            name: "Keanu Reeves".to_string(),
            cast_member_type: CastMemberType::Actor,
            created_at: None,
        }
    }
}

impl CastMemberFakeBuilder {
    pub fn with_id(mut self, cast_member_id: CastMemberId) -> Self {
        self.cast_member_id = Some(cast_member_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn director(mut self) -> Self {
        self.cast_member_type = CastMemberType::Director;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> CastMember {
        CastMember::restore(
            self.cast_member_id.unwrap_or_default(),
            self.name,
            self.cast_member_type,
            self.created_at.unwrap_or_else(Utc::now),
        )
    }

    pub fn build_many(self, count: usize) -> Vec<CastMember> {
        let base = self.created_at.unwrap_or_else(Utc::now);
        (0..count)
            .map(|i| {
                CastMember::restore(
                    CastMemberId::new(),
                    format!("{} {}", self.name, i),
                    self.cast_member_type,
                    base + Duration::seconds(i as i64),
                )
            })
            .collect()
    }
}

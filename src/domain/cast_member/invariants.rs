use validator::Validate;

use super::entity::CastMember;
use crate::domain::shared::{validate_rules, Notification, ValidatorFields};

#[derive(Debug, Validate)]
struct CastMemberRules {
    #[validate(length(min = 1, max = 255))]
    name: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CastMemberValidator;

impl ValidatorFields<CastMember> for CastMemberValidator {
    fn default_fields(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(
        &self,
        notification: &mut Notification,
        data: &CastMember,
        fields: Option<&[&str]>,
    ) -> bool {
        let rules = CastMemberRules {
            name: data.name.clone(),
        };
        validate_rules(notification, &rules, fields.unwrap_or(self.default_fields()))
    }
}

pub fn validate_cast_member(
    notification: &mut Notification,
    cast_member: &CastMember,
    fields: Option<&[&str]>,
) -> bool {
    CastMemberValidator.validate(notification, cast_member, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cast_member::{
        CastMemberCreateCommand, CastMemberFilter, CastMemberType, InvalidCastMemberType,
    };
    use crate::domain::{AggregateRoot, Either, Searchable};

    #[test]
    fn test_type_membership() {
        assert_eq!(CastMemberType::create(1), Either::Ok(CastMemberType::Director));
        assert_eq!(CastMemberType::create(2), Either::Ok(CastMemberType::Actor));
        assert_eq!(CastMemberType::create(3), Either::Fail(InvalidCastMemberType(3)));
    }

    #[test]
    fn test_type_serializes_as_code() {
        assert_eq!(serde_json::to_string(&CastMemberType::Director).unwrap(), "1");
        assert!(serde_json::from_str::<CastMemberType>("9").is_err());
    }

    #[test]
    fn test_name_and_type_errors_accumulate() {
        let (kind, kind_error) = CastMemberType::create(7).as_array();
        let mut cast_member = CastMember::draft(CastMemberCreateCommand {
            name: String::new(),
            cast_member_type: kind.unwrap_or_default(),
        });
        if let Some(error) = kind_error {
            cast_member
                .notification_mut()
                .set_error(error.to_string(), Some("type"));
        }

        let notification = cast_member.notification();
        assert!(notification.errors_for("name").is_some());
        assert_eq!(
            notification.errors_for("type").unwrap(),
            &["Invalid cast member type: 7".to_string()]
        );
        assert!(cast_member.ensure_valid().is_err());
    }

    #[test]
    fn test_filter_by_type_and_name() {
        let cast_member = CastMember::create(CastMemberCreateCommand {
            name: "Christopher Nolan".into(),
            cast_member_type: CastMemberType::Director,
        })
        .unwrap();

        assert!(cast_member.matches(&CastMemberFilter {
            name: Some("nolan".into()),
            cast_member_type: Some(CastMemberType::Director),
        }));
        assert!(!cast_member.matches(&CastMemberFilter {
            name: None,
            cast_member_type: Some(CastMemberType::Actor),
        }));
    }
}

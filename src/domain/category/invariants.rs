use validator::Validate;

use super::entity::Category;
use crate::domain::shared::{validate_rules, Notification, ValidatorFields};

#[derive(Debug, Validate)]
struct CategoryRules {
    #[validate(length(min = 1, max = 255))]
    name: String,
}

/// Field rules for Category
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryValidator;

impl ValidatorFields<Category> for CategoryValidator {
    fn default_fields(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(
        &self,
        notification: &mut Notification,
        data: &Category,
        fields: Option<&[&str]>,
    ) -> bool {
        let rules = CategoryRules {
            name: data.name.clone(),
        };
        validate_rules(notification, &rules, fields.unwrap_or(self.default_fields()))
    }
}

/// Validates Category fields into `notification`
pub fn validate_category(
    notification: &mut Notification,
    category: &Category,
    fields: Option<&[&str]>,
) -> bool {
    CategoryValidator.validate(notification, category, fields)
}

use validator::Validate;

use super::entity::Video;
use crate::domain::shared::{validate_rules, Notification, ValidatorFields};

#[derive(Debug, Validate)]
struct VideoRules {
    #[validate(length(min = 1, max = 255))]
    title: String,
    #[validate(length(min = 1))]
    description: String,
    #[validate(range(min = 1800, max = 2100))]
    year_launched: i32,
    #[validate(range(min = 1))]
    duration: u32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VideoValidator;

impl ValidatorFields<Video> for VideoValidator {
    fn default_fields(&self) -> &'static [&'static str] {
        &["title", "description", "year_launched", "duration"]
    }

    fn validate(&self, notification: &mut Notification, data: &Video, fields: Option<&[&str]>) -> bool {
        let rules = VideoRules {
            title: data.title.clone(),
            description: data.description.clone(),
            year_launched: data.year_launched,
            duration: data.duration,
        };
        validate_rules(notification, &rules, fields.unwrap_or(self.default_fields()))
    }
}

pub fn validate_video(notification: &mut Notification, video: &Video, fields: Option<&[&str]>) -> bool {
    VideoValidator.validate(notification, video, fields)
}

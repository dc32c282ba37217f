use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::Either;

/// Age rating of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    #[default]
    #[serde(rename = "L")]
    RL,
    #[serde(rename = "10")]
    R10,
    #[serde(rename = "12")]
    R12,
    #[serde(rename = "14")]
    R14,
    #[serde(rename = "16")]
    R16,
    #[serde(rename = "18")]
    R18,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The rating must be one of the following values: L, 10, 12, 14, 16, 18, passed value: {0}")]
pub struct InvalidRating(pub String);

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::RL,
        Rating::R10,
        Rating::R12,
        Rating::R14,
        Rating::R16,
        Rating::R18,
    ];

    pub fn create(value: &str) -> Either<Rating, InvalidRating> {
        match Self::ALL.into_iter().find(|rating| rating.as_str() == value) {
            Some(rating) => Either::ok(rating),
            None => Either::fail(InvalidRating(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::RL => "L",
            Rating::R10 => "10",
            Rating::R12 => "12",
            Rating::R14 => "14",
            Rating::R16 => "16",
            Rating::R18 => "18",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ratings() {
        for rating in Rating::ALL {
            assert_eq!(Rating::create(rating.as_str()), Either::Ok(rating));
        }
    }

    #[test]
    fn test_unknown_rating_fails() {
        let (rating, error) = Rating::create("21").as_array();
        assert!(rating.is_none());
        assert!(error.unwrap().to_string().contains("passed value: 21"));
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Rating::R14).unwrap(), "\"14\"");
    }
}

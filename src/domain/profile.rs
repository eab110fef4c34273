//! User profile record and the partial update applied by the profile editor.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: Option<String>,
    pub gender: Gender,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl FromStr for Gender {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            value => Err(ApiError::Validation(format!("invalid gender `{value}`"))),
        }
    }
}

/// Fields of a profile update. `None` leaves the stored value untouched.
#[derive(Debug, Default, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "first name cannot be blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last name cannot be blank"))]
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub gender: Option<Gender>,
    pub profile_image: Option<String>,
}

//! Users and their postal addresses.

use crate::validation::rules;
use crate::{AddressId, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A user registration. The id comes from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(custom(function = "rules::valid_id"))]
    pub id: UserId,
    #[validate(custom(function = "rules::not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Replaceable fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[validate(custom(function = "rules::not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

impl From<NewUser> for User {
    fn from(user: NewUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

impl User {
    #[must_use]
    pub fn with_profile(id: UserId, profile: UserProfile) -> Self {
        Self {
            id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub user_id: UserId,
}

/// Fields of an address insert or whole-row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[validate(custom(function = "rules::not_blank"))]
    pub street: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub city: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub state: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub country: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub zip_code: String,
    #[validate(custom(function = "rules::valid_id"))]
    pub user_id: UserId,
}

impl Address {
    #[must_use]
    pub fn from_new(id: AddressId, fields: NewAddress) -> Self {
        Self {
            id,
            street: fields.street,
            city: fields.city,
            state: fields.state,
            country: fields.country,
            zip_code: fields.zip_code,
            user_id: fields.user_id,
        }
    }
}

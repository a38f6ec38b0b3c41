use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{User, UserInput};

/// REST DTO for user representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// REST DTO for creating or replacing a user.
/// Both fields are optional at the wire level so that a missing field is
/// reported by validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `{ "data": user }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub data: UserDto,
}

/// `{ "data": [user, ...] }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Uniform error body for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<UserReq> for UserInput {
    fn from(req: UserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { data: user.into() }
    }
}

impl From<Vec<User>> for UserListResponse {
    fn from(users: Vec<User>) -> Self {
        Self {
            data: users.into_iter().map(UserDto::from).collect(),
        }
    }
}

//! Authenticated actor supplied by the upstream gateway.
//!
//! Session issuance lives outside this service; the gateway forwards the verified user id and
//! role as request headers and handlers extract them as an [`Actor`].

use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Identifier wrapper for marketplace users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Owner,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "client" | "tenant" => Some(Self::Client),
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(id),
            role,
        }
    }

    pub fn client(id: impl Into<String>) -> Self {
        Self::new(id, Role::Client)
    }

    pub fn owner(id: impl Into<String>) -> Self {
        Self::new(id, Role::Owner)
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityRejection {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("unrecognized role '{0}'")]
    UnknownRole(String),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, USER_ID_HEADER)?;
        let raw_role = header_value(parts, USER_ROLE_HEADER)?;
        let role =
            Role::parse(&raw_role).ok_or_else(|| IdentityRejection::UnknownRole(raw_role))?;

        Ok(Actor {
            id: UserId(id),
            role,
        })
    }
}

fn header_value(parts: &Parts, name: &'static str) -> Result<String, IdentityRejection> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(IdentityRejection::MissingHeader(name))
}

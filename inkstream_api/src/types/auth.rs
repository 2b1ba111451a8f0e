//! Auth request and response payloads.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Successful login payload. The token is opaque to this crate; callers
/// hand it back via [`Client::set_token`](crate::Client::set_token).
#[derive(Deserialize, Clone, Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Endpoints that only confirm an action answer with a bare message.
#[derive(Deserialize, Clone, Debug)]
pub struct AckMessage {
    pub message: String,
}

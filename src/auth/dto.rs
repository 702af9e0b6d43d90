use serde::{Deserialize, Serialize};

use crate::{auth::repo_types::NewAccount, error::AppError};

/// Request body for signup. Every field is required; presence is checked later
/// so a missing field gets the same answer as an empty one.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    pub fn into_new_account(self) -> Result<NewAccount, AppError> {
        Ok(NewAccount {
            username: required(self.username)?,
            name: required(self.name)?,
            dob: required(self.dob)?,
            gender: required(self.gender)?,
            phone: required(self.phone)?,
            email: required(self.email)?,
            role: required(self.role)?,
            password: required(self.password)?,
        })
    }
}

fn required(value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation("All fields are required")),
    }
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn credentials(self) -> Result<(String, String), AppError> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(AppError::Validation("Username and password are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub name: String,
    pub role: String,
}

use serde::Deserialize;

/// Body of `PATCH /users/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

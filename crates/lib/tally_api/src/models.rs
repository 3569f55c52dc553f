//! Request and response bodies.
//!
//! Required fields are `Option` so that an absent field surfaces as a
//! 400 validation error from the handler instead of a deserialization
//! rejection.

use serde::{Deserialize, Serialize};

use tally_core::models::auth::User;
use tally_core::models::todo::Todo;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub content: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub content: String,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            content: t.content,
            completed: t.completed,
            user_id: t.user_id,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

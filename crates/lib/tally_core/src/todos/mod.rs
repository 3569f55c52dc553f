//! Todo operations: CRUD scoped to the owning user.
//!
//! Every operation that addresses a todo by ID checks existence first
//! (not-found) and ownership second (forbidden), in that order.

pub mod queries;

use sqlx::PgPool;
use thiserror::Error;

use crate::auth::ownership::{OwnershipViolation, check_ownership};
use crate::models::todo::Todo;

/// Todo operation errors.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Forbidden(#[from] OwnershipViolation),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// List the caller's todos, newest first.
pub async fn list_todos(pool: &PgPool, owner_id: i64) -> Result<Vec<Todo>, TodoError> {
    Ok(queries::list_for_user(pool, owner_id).await?)
}

/// Create a todo owned by `owner_id`.
///
/// The owner always comes from the resolved identity, never from the
/// request body.
pub async fn create_todo(pool: &PgPool, owner_id: i64, content: &str) -> Result<Todo, TodoError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(TodoError::Validation("content must not be empty".into()));
    }
    Ok(queries::insert(pool, owner_id, content).await?)
}

/// Fetch a single todo the caller owns.
pub async fn get_todo(pool: &PgPool, requester_id: i64, todo_id: i64) -> Result<Todo, TodoError> {
    let todo = queries::find_by_id(pool, todo_id)
        .await?
        .ok_or(TodoError::NotFound(todo_id))?;
    check_ownership(todo.user_id, requester_id)?;
    Ok(todo)
}

/// Update a todo's content and/or completed flag.
pub async fn update_todo(
    pool: &PgPool,
    requester_id: i64,
    todo_id: i64,
    content: Option<&str>,
    completed: Option<bool>,
) -> Result<Todo, TodoError> {
    let todo = queries::find_by_id(pool, todo_id)
        .await?
        .ok_or(TodoError::NotFound(todo_id))?;
    check_ownership(todo.user_id, requester_id)?;

    let content = match content {
        Some(c) => {
            let trimmed = c.trim();
            if trimmed.is_empty() {
                return Err(TodoError::Validation("content must not be empty".into()));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };
    Ok(queries::update(pool, todo_id, content.as_deref(), completed).await?)
}

/// Delete a todo the caller owns.
pub async fn delete_todo(pool: &PgPool, requester_id: i64, todo_id: i64) -> Result<(), TodoError> {
    let todo = queries::find_by_id(pool, todo_id)
        .await?
        .ok_or(TodoError::NotFound(todo_id))?;
    check_ownership(todo.user_id, requester_id)?;
    queries::delete(pool, todo_id).await?;
    Ok(())
}

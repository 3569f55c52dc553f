//! Todo table queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::todo::Todo;

type TodoRow = (i64, String, bool, i64, DateTime<Utc>);

fn from_row((id, content, completed, user_id, created_at): TodoRow) -> Todo {
    Todo {
        id,
        content,
        completed,
        user_id,
        created_at,
    }
}

/// List all todos owned by a user, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TodoRow>(
        "SELECT id, content, completed, user_id, created_at FROM todos \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(from_row).collect())
}

/// Fetch a todo by ID.
pub async fn find_by_id(pool: &PgPool, todo_id: i64) -> Result<Option<Todo>, sqlx::Error> {
    let row = sqlx::query_as::<_, TodoRow>(
        "SELECT id, content, completed, user_id, created_at FROM todos WHERE id = $1",
    )
    .bind(todo_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(from_row))
}

/// Insert a new todo, returning the stored row.
pub async fn insert(pool: &PgPool, user_id: i64, content: &str) -> Result<Todo, sqlx::Error> {
    let row = sqlx::query_as::<_, TodoRow>(
        "INSERT INTO todos (content, user_id) VALUES ($1, $2) \
         RETURNING id, content, completed, user_id, created_at",
    )
    .bind(content)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(from_row(row))
}

/// Update content and/or completed; absent fields keep their value.
pub async fn update(
    pool: &PgPool,
    todo_id: i64,
    content: Option<&str>,
    completed: Option<bool>,
) -> Result<Todo, sqlx::Error> {
    let row = sqlx::query_as::<_, TodoRow>(
        "UPDATE todos SET content = COALESCE($2, content), \
                          completed = COALESCE($3, completed) \
         WHERE id = $1 RETURNING id, content, completed, user_id, created_at",
    )
    .bind(todo_id)
    .bind(content)
    .bind(completed)
    .fetch_one(pool)
    .await?;
    Ok(from_row(row))
}

/// Delete a todo by ID.
pub async fn delete(pool: &PgPool, todo_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(todo_id)
        .execute(pool)
        .await?;
    Ok(())
}

//! Todo request handlers. All routes here sit behind the auth middleware.

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    CreateTodoRequest, SuccessResponse, TodoListResponse, TodoResponse, UpdateTodoRequest,
};

/// `GET /todos` — list the caller's todos.
pub async fn list_todos_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<TodoListResponse>> {
    let todos = tally_core::todos::list_todos(&state.pool, user.0.id).await?;
    Ok(Json(TodoListResponse {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    }))
}

/// `POST /todos` — create a todo owned by the caller.
pub async fn create_todo_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(body): Json<CreateTodoRequest>,
) -> AppResult<(StatusCode, Json<TodoResponse>)> {
    let content = body.content.unwrap_or_default();
    let todo = tally_core::todos::create_todo(&state.pool, user.0.id, &content).await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// `GET /todos/{id}` — fetch one of the caller's todos.
pub async fn get_todo_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(todo_id): Path<i64>,
) -> AppResult<Json<TodoResponse>> {
    let todo = tally_core::todos::get_todo(&state.pool, user.0.id, todo_id).await?;
    Ok(Json(todo.into()))
}

/// `PATCH /todos/{id}` — update content and/or completed flag.
pub async fn update_todo_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(todo_id): Path<i64>,
    Json(body): Json<UpdateTodoRequest>,
) -> AppResult<Json<TodoResponse>> {
    let todo = tally_core::todos::update_todo(
        &state.pool,
        user.0.id,
        todo_id,
        body.content.as_deref(),
        body.completed,
    )
    .await?;
    Ok(Json(todo.into()))
}

/// `DELETE /todos/{id}` — delete one of the caller's todos.
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(todo_id): Path<i64>,
) -> AppResult<Json<SuccessResponse>> {
    tally_core::todos::delete_todo(&state.pool, user.0.id, todo_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

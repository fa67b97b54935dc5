use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use shared_types::{MessageResponse, Todo, TodoRequest};
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::{self, todos};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewTodo, TodoChanges};
use crate::AppState;

/// Todo ids are positive; anything else cannot name a row.
fn check_todo_id(todo_id: i32) -> ApiResult<i32> {
    if todo_id > 0 {
        Ok(todo_id)
    } else {
        Err(ApiError::Validation(
            "todo_id: must be greater than 0".to_string(),
        ))
    }
}

fn todo_not_found() -> ApiError {
    ApiError::not_found("Todo")
}

// Todo handlers, each scoped to the caller's own todos
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Todo>>> {
    let mut conn = db::get_conn(&state.pool).await?;
    let items = todos::list_for_owner(&mut conn, user.user_id).await?;

    Ok(Json(items))
}

pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(todo_id): Path<i32>,
) -> ApiResult<Json<Todo>> {
    let todo_id = check_todo_id(todo_id)?;

    let mut conn = db::get_conn(&state.pool).await?;
    let todo = todos::get_for_owner(&mut conn, todo_id, user.user_id)
        .await?
        .ok_or_else(todo_not_found)?;

    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    payload.validate()?;

    let mut conn = db::get_conn(&state.pool).await?;
    let todo = todos::create(&mut conn, NewTodo::from_request(&payload, user.user_id)).await?;

    tracing::debug!("User {} created todo {}", user.user_id, todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(todo_id): Path<i32>,
    Json(payload): Json<TodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let todo_id = check_todo_id(todo_id)?;
    payload.validate()?;

    let mut conn = db::get_conn(&state.pool).await?;
    let todo = todos::update(&mut conn, todo_id, user.user_id, TodoChanges::from(&payload))
        .await?
        .ok_or_else(todo_not_found)?;

    Ok((StatusCode::ACCEPTED, Json(todo)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(todo_id): Path<i32>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let todo_id = check_todo_id(todo_id)?;

    let mut conn = db::get_conn(&state.pool).await?;
    if !todos::delete(&mut conn, todo_id, user.user_id).await? {
        return Err(todo_not_found());
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "Todo deleted successfully".to_string(),
        }),
    ))
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

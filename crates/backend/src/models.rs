// Database models for Diesel
use diesel::prelude::*;
use shared_types::TodoRequest;

/// Insertable struct for new users
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub hashed_password: &'a str,
    pub is_active: bool,
    pub role: &'a str,
}

/// Insertable struct for new todos
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::todos)]
pub struct NewTodo<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i32,
}

impl<'a> NewTodo<'a> {
    pub fn from_request(request: &'a TodoRequest, owner_id: i32) -> Self {
        NewTodo {
            title: &request.title,
            description: &request.description,
            priority: request.priority,
            complete: request.complete,
            owner_id,
        }
    }
}

/// Full replacement of a todo's editable fields
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::todos)]
pub struct TodoChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: i32,
    pub complete: bool,
}

impl<'a> From<&'a TodoRequest> for TodoChanges<'a> {
    fn from(request: &'a TodoRequest) -> Self {
        TodoChanges {
            title: &request.title,
            description: &request.description,
            priority: request.priority,
            complete: request.complete,
        }
    }
}

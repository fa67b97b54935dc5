use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Longest password accepted, in bytes; bcrypt ignores anything past this.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("length");
        error.message = Some(format!("must be 1 to {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// User struct matching database column order exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(diesel::Queryable))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub role: String, // free-text tag, e.g. "admin"
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            role: user.role,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(custom = "validate_password_bytes")]
    pub password: String,
    pub role: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Todo struct matching database column order exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(diesel::Queryable))]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i32,
}

/// Body of todo create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TodoRequest {
    #[validate(length(min = 3, max = 50))]
    pub title: String,
    #[validate(length(min = 10, max = 100))]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
    #[serde(default)]
    pub complete: bool,
}

// Auth API types

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Identity of the caller as reported by `GET /auth/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub username: String,
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_todo() -> TodoRequest {
        TodoRequest {
            title: "Buy milk".to_string(),
            description: "Two litres, semi-skimmed".to_string(),
            priority: 3,
            complete: false,
        }
    }

    #[test]
    fn test_todo_request_accepts_valid_input() {
        assert!(valid_todo().validate().is_ok());
    }

    #[test]
    fn test_todo_request_rejects_short_title() {
        let mut todo = valid_todo();
        todo.title = "ab".to_string();
        assert!(todo.validate().is_err());
    }

    #[test]
    fn test_todo_request_rejects_short_description() {
        let mut todo = valid_todo();
        todo.description = "too short".to_string();
        assert!(todo.validate().is_err());
    }

    #[test]
    fn test_todo_request_priority_bounds() {
        let mut todo = valid_todo();
        todo.priority = 0;
        assert!(todo.validate().is_err());
        todo.priority = 6;
        assert!(todo.validate().is_err());
        todo.priority = 5;
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn test_todo_request_complete_defaults_to_false() {
        let json = r#"{"title":"Buy milk","description":"Two litres please","priority":2}"#;
        let todo: TodoRequest = serde_json::from_str(json).unwrap();
        assert!(!todo.complete);
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let user = User {
            id: 1,
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            hashed_password: "$2b$04$secret".to_string(),
            is_active: true,
            role: "admin".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_create_user_request_debug_redacts_password() {
        let req = CreateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            password: "hunter2".to_string(),
            role: "admin".to_string(),
        };
        assert!(req.validate().is_ok());
        assert!(!format!("{:?}", req).contains("hunter2"));
    }

    #[test]
    fn test_create_user_request_password_byte_limit() {
        let mut req = CreateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            password: "a".repeat(MAX_PASSWORD_BYTES),
            role: "user".to_string(),
        };
        assert!(req.validate().is_ok());

        req.password.push('a');
        assert!(req.validate().is_err());

        // 25 three-byte characters: short in chars, too long in bytes.
        req.password = "\u{20ac}".repeat(25);
        assert!(req.validate().is_err());

        req.password = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_token_response_is_bearer() {
        let token = TokenResponse::bearer("abc".to_string());
        assert_eq!(token.token_type, "bearer");
        assert_eq!(
            serde_json::to_string(&token).unwrap(),
            r#"{"access_token":"abc","token_type":"bearer"}"#
        );
    }
}

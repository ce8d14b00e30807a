/**
 * Input Validation
 *
 * Shape checks applied to request bodies before any store is touched.
 * Every check returns `SharedError::ValidationError` naming the field.
 *
 * # Rules
 *
 * - Username: 3-30 chars, starts with a letter, then letters, digits or `_`
 * - Email: contains `@` with text on both sides, at most 255 characters
 * - Password: at least 8 characters
 * - Bio, profile image URL: at most 255 characters
 * - Post content: 1-255 characters after trimming
 */

use crate::shared::error::SharedError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum post length, matching the `posts.content` column
pub const MAX_POST_LEN: usize = 255;

/// Width of the `VARCHAR(255)` text columns on `users`
pub const MAX_FIELD_LEN: usize = 255;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let valid = (3..=30).contains(&username.len()) && {
        let mut chars = username.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    if valid {
        Ok(())
    } else {
        Err(SharedError::validation(
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            validate_profile_field("email", email)
        }
        _ => Err(SharedError::validation("email", "Invalid email format")),
    }
}

/// Reject free-text profile values that would overflow their column
pub fn validate_profile_field(field: &str, value: &str) -> Result<(), SharedError> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(SharedError::validation(
            field,
            format!("{} must be at most {} characters", field, MAX_FIELD_LEN),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Validate post content and return it trimmed
pub fn validate_post_content(content: &str) -> Result<String, SharedError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(SharedError::validation("content", "Post content cannot be empty"));
    }
    if content.chars().count() > MAX_POST_LEN {
        return Err(SharedError::validation(
            "content",
            format!("Post content must be at most {} characters", MAX_POST_LEN),
        ));
    }
    Ok(content.to_string())
}

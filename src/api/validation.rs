use super::ApiError;

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if trimmed.len() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }

    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email cannot be empty"));
    }

    if !trimmed.contains('@') || trimmed.starts_with('@') || trimmed.ends_with('@') {
        return Err(ApiError::validation(format!(
            "Invalid email address: {}",
            trimmed
        )));
    }

    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    Ok(password)
}

pub fn validate_habit_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Habit name cannot be empty"));
    }

    if trimmed.len() > 100 {
        return Err(ApiError::validation(
            "Habit name must be 100 characters or less",
        ));
    }

    Ok(trimmed)
}

pub fn validate_habit_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid habit ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_non_negative(field: &str, value: i32) -> Result<i32, ApiError> {
    if value < 0 {
        return Err(ApiError::validation(format!(
            "Invalid {}: {}. Value must not be negative",
            field, value
        )));
    }
    Ok(value)
}

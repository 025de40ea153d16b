use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Course codes look like CS101 or MATH2010: 2-4 uppercase letters followed
/// by 3-4 digits.
pub(crate) fn validate_course_code(code: &str) -> Result<(), ApiError> {
    let letters = code.chars().take_while(|c| c.is_ascii_uppercase()).count();
    let digits = code.chars().skip(letters).count();
    let valid = (2..=4).contains(&letters)
        && (3..=4).contains(&digits)
        && code.chars().skip(letters).all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid course code format (e.g., CS101, MATH201)".to_string()))
    }
}

pub(crate) fn validate_password_strength(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::BadRequest(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::BadRequest(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Password must contain at least one number".to_string()));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::BadRequest(
            "Password must contain at least one special character".to_string(),
        ));
    }

    Ok(())
}

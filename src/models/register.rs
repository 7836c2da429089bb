use serde::{Deserialize, Serialize};
use shared::{ApiError, RegisterRequest};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

// ============================================================================
// REGISTRATION FORM
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 4, max = 8, message = "Password must be between 4 and 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Confirm password is required"))]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Validated request body, or the failing fields and their messages.
    pub fn to_request(&self) -> Result<RegisterRequest, ApiError> {
        self.validate()
            .map_err(|errors| ApiError::invalid_form(format_validation_errors(&errors)))?;

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut formatted_errors = HashMap::new();

    for (field, field_errors) in errors.field_errors() {
        let mut field_messages = Vec::new();

        for error in field_errors {
            let message = match error.message {
                Some(ref msg) => msg.to_string(),
                None => match error.code.as_ref() {
                    "length" => "Invalid length".to_string(),
                    "must_match" => "Values do not match".to_string(),
                    _ => "Invalid value".to_string(),
                },
            };
            field_messages.push(message);
        }

        formatted_errors.insert(field.to_string(), field_messages);
    }

    formatted_errors
}

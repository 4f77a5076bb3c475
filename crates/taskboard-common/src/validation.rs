//! Client-side form validation.
//!
//! Every form is checked before any request is made. Failures are reported
//! per field so a front end can show the message next to the input; nothing
//! is sent while any field is in error.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

/// Field-level validation failures, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    fields: Vec<(&'static str, String)>,
}

impl ValidationError {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Message for one field, if it failed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, message)| message.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

fn check_email(errors: &mut ValidationError, email: &str, required: &str) {
    if blank(email) {
        errors.push("email", required);
    } else if !is_valid_email(email) {
        errors.push("email", "Email is not a valid address");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_email(&mut errors, &self.email, "Email is required");
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub surname: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_email(&mut errors, &self.email, "Email required!");
        if blank(&self.username) {
            errors.push("username", "Username required!");
        }
        if blank(&self.first_name) {
            errors.push("first_name", "First name required!");
        }
        if blank(&self.surname) {
            errors.push("surname", "Surname required!");
        }
        if self.password.is_empty() {
            errors.push("password", "Password required!");
        }
        if self.confirm_password.is_empty() {
            errors.push("confirm_password", "Confirm password!");
        } else if self.confirm_password != self.password {
            errors.push("confirm_password", "Passwords do not match");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if self.current_password.is_empty() {
            errors.push("current_password", "Current password is required.");
        }
        let len = self.new_password.chars().count();
        if self.new_password.is_empty() {
            errors.push("new_password", "New password is required.");
        } else if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
            errors.push(
                "new_password",
                format!(
                    "Password must be between {} and {} characters long.",
                    PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
                ),
            );
        }
        if self.confirm_password.is_empty() {
            errors.push("confirm_password", "Confirm password is required.");
        } else if self.confirm_password != self.new_password {
            errors.push(
                "confirm_password",
                "Confirm password does not match new password.",
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub name: String,
    pub detail: String,
    pub due_date: Option<String>,
}

impl TaskForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if blank(&self.name) {
            errors.push("name", "Task name required!");
        }
        if let Some(date) = self.due_date.as_deref()
            && crate::time::parse_backend_time(date).is_none()
        {
            errors.push("due_date", "Due date is not a valid date");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeetingForm {
    pub topic: String,
    pub location: String,
    pub date: Option<String>,
}

impl MeetingForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if blank(&self.topic) {
            errors.push("topic", "Meeting topic is required!");
        }
        if let Some(date) = self.date.as_deref()
            && crate::time::parse_backend_time(date).is_none()
        {
            errors.push("date", "Meeting date is not a valid date");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InviteForm {
    pub email: String,
    pub role: String,
}

impl InviteForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_email(&mut errors, &self.email, "Email required!");
        if blank(&self.role) {
            errors.push("role", "Role required!");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub deadline: Option<String>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if blank(&self.name) {
            errors.push("name", "Project name required!");
        }
        match self.deadline.as_deref() {
            None => errors.push("deadline", "Please select a due date"),
            Some(date) if crate::time::parse_backend_time(date).is_none() => {
                errors.push("deadline", "Due date is not a valid date")
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}

/// Comments are only sent when they contain something besides whitespace.
pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    if blank(text) {
        errors.push("comment", "Comment cannot be empty");
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let err = LoginForm::default().validate().unwrap_err();
        assert_eq!(err.field("email"), Some("Email is required"));
        assert_eq!(err.field("password"), Some("Password is required"));
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field("email"), Some("Email is not a valid address"));
        assert_eq!(err.field("password"), None);
    }

    #[test]
    fn test_registration_confirmation_mismatch() {
        let form = RegistrationForm {
            email: "a@b.io".into(),
            username: "nich".into(),
            first_name: "Nichakann".into(),
            surname: "N".into(),
            password: "password1".into(),
            confirm_password: "password2".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields().count(), 1);
        assert_eq!(err.field("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn test_registration_ok() {
        let form = RegistrationForm {
            email: "a@b.io".into(),
            username: "nich".into(),
            first_name: "Nichakann".into(),
            surname: "N".into(),
            password: "password1".into(),
            confirm_password: "password1".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_length_bounds() {
        let form = |new: &str| PasswordChangeForm {
            current_password: "old".into(),
            new_password: new.into(),
            confirm_password: new.into(),
        };
        assert!(form("1234567").validate().is_err());
        assert!(form("12345678").validate().is_ok());
        assert!(form(&"x".repeat(20)).validate().is_ok());
        let err = form(&"x".repeat(21)).validate().unwrap_err();
        assert!(err.field("new_password").unwrap().contains("between 8 and 20"));
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let form = PasswordChangeForm {
            current_password: "old".into(),
            new_password: "newpassword".into(),
            confirm_password: "newpassw0rd".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.field("confirm_password"),
            Some("Confirm password does not match new password.")
        );
    }

    #[test]
    fn test_task_form_requires_name() {
        let err = TaskForm::default().validate().unwrap_err();
        assert_eq!(err.field("name"), Some("Task name required!"));
        let ok = TaskForm {
            name: "Create header".into(),
            due_date: Some("2024-10-01".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_project_form_requires_deadline() {
        let form = ProjectForm {
            name: "Site".into(),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field("deadline"), Some("Please select a due date"));
    }

    #[test]
    fn test_meeting_and_invite_forms() {
        assert!(MeetingForm::default().validate().is_err());
        let invite = InviteForm {
            email: "dev@team.io".into(),
            role: "MEMBER".into(),
        };
        assert!(invite.validate().is_ok());
    }

    #[test]
    fn test_blank_comment_rejected() {
        assert!(validate_comment("   ").is_err());
        assert!(validate_comment("Nice").is_ok());
    }

    #[test]
    fn test_display_joins_fields() {
        let err = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "email: Email is required; password: Password is required"
        );
    }
}

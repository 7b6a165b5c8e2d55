/// Request payloads and their validation rules
///
/// DTOs derive [`validator::Validate`]; failures are turned into a list of
/// [`ValidationErrorDetail`]s whose messages are rendered in the caller's
/// [`Locale`] by [`i18n::render`].
///
/// Missing JSON fields deserialize to empty values so they are reported as
/// `required` field errors rather than as a malformed payload.

pub mod i18n;

use crate::error::{ApiError, ValidationErrorDetail};
use serde::Deserialize;
use userdesk_shared::auth::password::password_rule_violations;
use userdesk_shared::services::{NewUser, PasswordChange};
use validator::{Validate, ValidationError, ValidationErrors};

pub use i18n::Locale;

/// Profile payload for creating and updating users
///
/// ```json
/// {
///   "name": "Ada",
///   "surname": "Lovelace",
///   "email": "ada@example.com",
///   "phone": "+44 20 7946 0000"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserDto {
    #[validate(custom(function = "required"), length(max = 50))]
    pub name: String,

    #[validate(custom(function = "required"), length(max = 50))]
    pub surname: String,

    #[validate(custom(function = "required"), email, length(max = 254))]
    pub email: String,

    #[validate(custom(function = "phone_number"))]
    pub phone: Option<String>,
}

impl UserDto {
    /// Strips surrounding whitespace so rules see the values that get stored
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.map(|p| p.trim().to_string()),
        }
    }
}

impl From<UserDto> for NewUser {
    fn from(dto: UserDto) -> Self {
        let dto = dto.trimmed();
        NewUser {
            name: dto.name,
            surname: dto.surname,
            email: dto.email,
            phone: dto.phone.filter(|p| !p.is_empty()),
        }
    }
}

/// Password change payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PasswordUpdateDto {
    #[validate(custom(function = "required"))]
    pub current_password: String,

    #[validate(custom(function = "strong_password"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password"))]
    pub confirm_password: String,
}

impl From<PasswordUpdateDto> for PasswordChange {
    fn from(dto: PasswordUpdateDto) -> Self {
        PasswordChange {
            current_password: dto.current_password,
            new_password: dto.new_password,
        }
    }
}

/// Rejects empty or whitespace-only values
fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Accepts 7 to 20 characters of digits, spaces and dashes, with an optional
/// leading `+`. Blank values are treated as absent.
fn phone_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    let body = value.strip_prefix('+').unwrap_or(value);
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    let well_formed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if !well_formed || !(7..=20).contains(&value.len()) || digits < 7 {
        return Err(ValidationError::new("phone"));
    }
    Ok(())
}

/// Requires a non-empty password that passes every strength rule
///
/// Reports the first failing rule as its own error code.
fn strong_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    match password_rule_violations(value).first() {
        Some(rule) => Err(ValidationError::new(rule.code())),
        None => Ok(()),
    }
}

/// Converts validator output into translated, deterministic error details
///
/// Details are sorted by field, then code. A field that is `required` but
/// missing reports only that error.
pub fn translate_errors(errors: &ValidationErrors, locale: Locale) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            let missing = field_errors.iter().any(|e| e.code == "required");

            field_errors
                .iter()
                .filter(move |e| !missing || e.code == "required")
                .map(move |e| ValidationErrorDetail {
                    field: field.clone(),
                    code: e.code.to_string(),
                    message: i18n::render(&field, &e.code, &e.params, locale),
                })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    details.dedup_by(|a, b| a.field == b.field && a.code == b.code);
    details
}

/// Validates a request payload, mapping failures to a 400 response
pub fn validate_request<T: Validate>(req: &T, locale: Locale) -> Result<(), ApiError> {
    req.validate()
        .map_err(|e| ApiError::ValidationError(translate_errors(&e, locale)))
}

/// Builds a single translated field error (for rules enforced outside the DTO)
pub fn field_error(field: &str, code: &str, locale: Locale) -> ValidationErrorDetail {
    ValidationErrorDetail {
        field: field.to_string(),
        code: code.to_string(),
        message: i18n::render(field, code, &Default::default(), locale),
    }
}

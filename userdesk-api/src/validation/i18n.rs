/// Translated validation messages
///
/// Validation errors carry a code (`required`, `length`, `email`, ...) and
/// parameters; this module renders them as human-readable text in the
/// caller's language.
///
/// # Supported locales
///
/// - `en`: English (default)
/// - `tr`: Turkish
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use userdesk_api::validation::i18n::{render, Locale};
///
/// let params = HashMap::new();
/// assert_eq!(render("email", "required", &params, Locale::En), "Email is required");
/// assert_eq!(render("email", "required", &params, Locale::Tr), "E-posta alanı zorunludur");
/// ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Language used to render validation messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Tr => "tr",
        }
    }

    /// Resolves a language tag such as `tr`, `tr-TR` or `en_US`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()?
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Locale::En),
            "tr" => Some(Locale::Tr),
            _ => None,
        }
    }

    /// Picks the most preferred supported locale from an `Accept-Language` value
    ///
    /// Entries are ranked by their `q` weight (default 1.0); ties keep header
    /// order. Returns `None` when no listed language is supported.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let locale = Locale::from_tag(parts.next()?)?;
                let weight = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (weight > 0.0).then_some((weight, position, locale))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, locale)| *locale)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| format!("Unsupported locale: {}", s))
    }
}

/// Display name of a request field
pub fn field_label(field: &str, locale: Locale) -> Cow<'static, str> {
    let label = match (field, locale) {
        ("name", Locale::En) => "Name",
        ("name", Locale::Tr) => "Ad",
        ("surname", Locale::En) => "Surname",
        ("surname", Locale::Tr) => "Soyad",
        ("email", Locale::En) => "Email",
        ("email", Locale::Tr) => "E-posta",
        ("phone", Locale::En) => "Phone",
        ("phone", Locale::Tr) => "Telefon",
        ("current_password", Locale::En) => "Current password",
        ("current_password", Locale::Tr) => "Mevcut şifre",
        ("new_password", Locale::En) => "New password",
        ("new_password", Locale::Tr) => "Yeni şifre",
        ("confirm_password", Locale::En) => "Password confirmation",
        ("confirm_password", Locale::Tr) => "Şifre tekrarı",
        (other, _) => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(label)
}

/// Field that `field` is required to equal
///
/// The validator's `other` parameter holds the compared value, not a field name.
fn match_target(field: &str) -> &str {
    match field {
        "confirm_password" => "new_password",
        other => other,
    }
}

fn param(params: &HashMap<Cow<'static, str>, Value>, key: &str) -> Option<String> {
    params.get(key).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Renders the message for one validation error
///
/// Unknown codes fall back to a generic "is invalid" message.
pub fn render(
    field: &str,
    code: &str,
    params: &HashMap<Cow<'static, str>, Value>,
    locale: Locale,
) -> String {
    let label = field_label(field, locale);
    let min = param(params, "min");
    let max = param(params, "max");

    match (code, locale) {
        ("required", Locale::En) => format!("{} is required", label),
        ("required", Locale::Tr) => format!("{} alanı zorunludur", label),

        ("length", _) => match (min, max, locale) {
            (Some(min), Some(max), Locale::En) => {
                format!("{} must be between {} and {} characters", label, min, max)
            }
            (Some(min), Some(max), Locale::Tr) => {
                format!("{} {} ile {} karakter arasında olmalıdır", label, min, max)
            }
            (Some(min), None, Locale::En) => format!("{} must be at least {} characters", label, min),
            (Some(min), None, Locale::Tr) => format!("{} en az {} karakter olmalıdır", label, min),
            (None, Some(max), Locale::En) => format!("{} must be at most {} characters", label, max),
            (None, Some(max), Locale::Tr) => format!("{} en fazla {} karakter olabilir", label, max),
            (None, None, _) => render(field, "invalid", params, locale),
        },

        ("email", Locale::En) => format!("{} must be a valid email address", label),
        ("email", Locale::Tr) => format!("{} geçerli bir e-posta adresi olmalıdır", label),

        ("phone", Locale::En) => format!("{} must be a valid phone number", label),
        ("phone", Locale::Tr) => format!("{} geçerli bir telefon numarası olmalıdır", label),

        ("must_match", _) => {
            let other = field_label(match_target(field), locale);
            match locale {
                Locale::En => format!("{} must match {}", label, other.to_lowercase()),
                Locale::Tr => format!("{}, {} ile eşleşmelidir", label, other.to_lowercase()),
            }
        }

        ("password_too_short", Locale::En) => format!(
            "{} must be at least {} characters long",
            label,
            userdesk_shared::auth::password::MIN_PASSWORD_LENGTH
        ),
        ("password_too_short", Locale::Tr) => format!(
            "{} en az {} karakter olmalıdır",
            label,
            userdesk_shared::auth::password::MIN_PASSWORD_LENGTH
        ),
        ("password_uppercase", Locale::En) => {
            format!("{} must contain at least one uppercase letter", label)
        }
        ("password_uppercase", Locale::Tr) => format!("{} en az bir büyük harf içermelidir", label),
        ("password_lowercase", Locale::En) => {
            format!("{} must contain at least one lowercase letter", label)
        }
        ("password_lowercase", Locale::Tr) => format!("{} en az bir küçük harf içermelidir", label),
        ("password_digit", Locale::En) => format!("{} must contain at least one digit", label),
        ("password_digit", Locale::Tr) => format!("{} en az bir rakam içermelidir", label),
        ("password_special", Locale::En) => {
            format!("{} must contain at least one special character", label)
        }
        ("password_special", Locale::Tr) => {
            format!("{} en az bir özel karakter içermelidir", label)
        }

        ("password_incorrect", Locale::En) => format!("{} is incorrect", label),
        ("password_incorrect", Locale::Tr) => format!("{} hatalı", label),
        ("password_reused", Locale::En) => {
            format!("{} must differ from the current password", label)
        }
        ("password_reused", Locale::Tr) => {
            format!("{} mevcut şifreden farklı olmalıdır", label)
        }

        (_, Locale::En) => format!("{} is invalid", label),
        (_, Locale::Tr) => format!("{} geçersiz", label),
    }
}

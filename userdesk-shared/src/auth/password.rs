/// Password hashing and credential generation
///
/// Passwords are stored as Argon2id hashes in PHC string format and never in
/// plaintext. New accounts receive a randomly generated credential that is
/// shown to the caller exactly once.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use userdesk_shared::auth::password::{generate_password, hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let password = generate_password(16);
/// let hash = hash_password(&password)?;
///
/// assert!(verify_password(&password, &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use rand::{seq::SliceRandom, Rng};
use std::fmt;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of credentials issued to new accounts
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SPECIAL: &[u8] = b"!@#$%^&*-_=+?";

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// A password strength requirement that was not met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial,
}

impl PasswordRule {
    /// Stable error code, used as the translation key for messages
    pub fn code(&self) -> &'static str {
        match self {
            PasswordRule::TooShort => "password_too_short",
            PasswordRule::MissingUppercase => "password_uppercase",
            PasswordRule::MissingLowercase => "password_lowercase",
            PasswordRule::MissingDigit => "password_digit",
            PasswordRule::MissingSpecial => "password_special",
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::TooShort => write!(
                f,
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
            PasswordRule::MissingUppercase => {
                f.write_str("Password must contain at least one uppercase letter")
            }
            PasswordRule::MissingLowercase => {
                f.write_str("Password must contain at least one lowercase letter")
            }
            PasswordRule::MissingDigit => f.write_str("Password must contain at least one digit"),
            PasswordRule::MissingSpecial => {
                f.write_str("Password must contain at least one special character")
            }
        }
    }
}

/// Hashes a password using Argon2id
///
/// A fresh 16-byte salt is drawn from the OS RNG for every call, so hashing
/// the same password twice yields different strings.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Returns `Ok(false)` for a wrong password and an error only when the hash
/// itself cannot be parsed or checked.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Validates password strength
///
/// Requirements, checked in this order:
/// - At least [`MIN_PASSWORD_LENGTH`] characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one digit
/// - At least one special (non-alphanumeric) character
///
/// # Example
///
/// ```
/// use userdesk_shared::auth::password::{validate_password_strength, PasswordRule};
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert_eq!(validate_password_strength("Sh0rt!"), Err(PasswordRule::TooShort));
/// assert_eq!(validate_password_strength("Password123"), Err(PasswordRule::MissingSpecial));
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), PasswordRule> {
    password_rule_violations(password)
        .into_iter()
        .next()
        .map_or(Ok(()), Err)
}

/// Returns every strength requirement the password fails, in check order
pub fn password_rule_violations(password: &str) -> Vec<PasswordRule> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PasswordRule::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push(PasswordRule::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push(PasswordRule::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_numeric()) {
        violations.push(PasswordRule::MissingDigit);
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        violations.push(PasswordRule::MissingSpecial);
    }

    violations
}

/// Generates a random password that satisfies every strength rule
///
/// The result always contains at least one uppercase letter, lowercase
/// letter, digit, and special character. Visually ambiguous characters
/// (`0/O`, `1/l/I`) are excluded. `length` is raised to
/// [`MIN_PASSWORD_LENGTH`] if smaller.
pub fn generate_password(length: usize) -> String {
    let length = length.max(MIN_PASSWORD_LENGTH);
    let mut rng = rand::thread_rng();
    let classes = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL];

    let mut chars: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();

    let all: Vec<u8> = classes.concat();
    while chars.len() < length {
        chars.push(all[rng.gen_range(0..all.len())]);
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

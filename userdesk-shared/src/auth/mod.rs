/// Credential utilities
///
/// - `password`: Argon2id hashing, strength rules, and random credential
///   generation for newly created accounts

pub mod password;

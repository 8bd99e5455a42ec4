use anyhow::{Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt::Display, str::FromStr};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    Argon2,
    /// Unsalted single-round SHA-256. Weak; only kept so older hashes keep verifying.
    Sha256,
}

impl Display for PasswordScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scheme = match self {
            PasswordScheme::Argon2 => "argon2",
            PasswordScheme::Sha256 => "sha256",
        };
        write!(f, "{}", scheme)
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(PasswordScheme::Argon2),
            "sha256" => Ok(PasswordScheme::Sha256),
            other => Err(format!("Unsupported password scheme: {}", other)),
        }
    }
}

impl PasswordScheme {
    /// Works out which scheme produced a stored hash.
    pub fn detect(stored_hash: &str) -> Option<Self> {
        if stored_hash.starts_with("$argon2") {
            Some(PasswordScheme::Argon2)
        } else if stored_hash.len() == 64 && stored_hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(PasswordScheme::Sha256)
        } else {
            None
        }
    }
}

/// Hashes new passwords with the configured scheme and verifies any stored format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    scheme: PasswordScheme,
}

impl PasswordHasher {
    pub fn new(scheme: PasswordScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> PasswordScheme {
        self.scheme
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        match self.scheme {
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let password_hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow!("Password hashing failed: {}", e))?
                    .to_string();
                Ok(password_hash)
            }
            PasswordScheme::Sha256 => Ok(sha256_hex(password)),
        }
    }

    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool> {
        match PasswordScheme::detect(stored_hash) {
            Some(PasswordScheme::Argon2) => {
                let parsed_hash = PasswordHash::new(stored_hash)
                    .map_err(|e| anyhow!("Invalid password hash: {}", e))?;
                match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(anyhow!("Password verification failed: {}", e)),
                }
            }
            Some(PasswordScheme::Sha256) => {
                Ok(sha256_hex(password).eq_ignore_ascii_case(stored_hash))
            }
            None => Err(anyhow!("Unrecognised password hash format")),
        }
    }

    /// True when a stored hash was produced by a different scheme than the configured one.
    pub fn needs_rehash(&self, stored_hash: &str) -> bool {
        PasswordScheme::detect(stored_hash) != Some(self.scheme)
    }
}

fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Login identifier must not be empty")]
  EmptyIdentifier,

  #[error("Origin must not be empty")]
  EmptyOrigin,

  #[error("Origin is not an IP address")]
  InvalidOrigin,

  #[error("Password must not be empty")]
  EmptyPassword,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Invalid token format")]
  InvalidToken,

  #[error("Unknown token ability: {0}")]
  UnknownAbility(String),
}

// ============================================================================
// LoginIdentifier Value Object
// ============================================================================

/// Identifier an admin logs in with (an email address in practice)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentifier(String);

impl LoginIdentifier {
  /// Creates a new identifier, trimming surrounding whitespace
  pub fn new(identifier: impl Into<String>) -> Result<Self, ValueObjectError> {
    let identifier = identifier.into().trim().to_string();

    if identifier.is_empty() {
      return Err(ValueObjectError::EmptyIdentifier);
    }

    Ok(Self(identifier))
  }

  /// Returns the identifier as provided
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Lowercased form used for lookups and throttle keys
  pub fn normalized(&self) -> String {
    self.0.to_lowercase()
  }
}

impl fmt::Display for LoginIdentifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Origin Value Object
// ============================================================================

/// Network origin of a login attempt: the client's IP address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin(IpAddr);

impl Origin {
  /// Parses a textual IP address
  pub fn new(origin: impl AsRef<str>) -> Result<Self, ValueObjectError> {
    let origin = origin.as_ref().trim();

    if origin.is_empty() {
      return Err(ValueObjectError::EmptyOrigin);
    }

    origin
      .parse::<IpAddr>()
      .map(Self)
      .map_err(|_| ValueObjectError::InvalidOrigin)
  }

  pub fn ip(&self) -> IpAddr {
    self.0
  }
}

impl From<IpAddr> for Origin {
  fn from(ip: IpAddr) -> Self {
    Self(ip)
  }
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  /// Creates a new Password; login only requires it to be present
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.is_empty() {
      return Err(ValueObjectError::EmptyPassword);
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing PHC hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// PlainTextToken Value Object (Bearer Token Handed To The Client)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PlainTextToken(String);

impl PlainTextToken {
  /// 32 random bytes, base64url without padding
  pub const ENCODED_LENGTH: usize = 43;

  /// Creates a PlainTextToken from a presented bearer value
  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();

    if token.len() != Self::ENCODED_LENGTH {
      return Err(ValueObjectError::InvalidToken);
    }

    if !token
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// Creates the hash under which this token is persisted
  pub fn hash(&self) -> TokenHash {
    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());

    TokenHash(hex::encode(hasher.finalize()))
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the token
impl fmt::Debug for PlainTextToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PlainTextToken(***)")
  }
}

// ============================================================================
// TokenHash Value Object (SHA-256 Hash of Token)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  /// Creates a TokenHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    // SHA-256 produces 64 hex characters
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TokenHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// TokenAbility Value Object
// ============================================================================

/// Capability scope attached to an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAbility {
  Admin,
}

impl TokenAbility {
  pub fn as_str(&self) -> &'static str {
    match self {
      TokenAbility::Admin => "admin",
    }
  }
}

impl FromStr for TokenAbility {
  type Err = ValueObjectError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "admin" => Ok(TokenAbility::Admin),
      other => Err(ValueObjectError::UnknownAbility(other.to_string())),
    }
  }
}

impl fmt::Display for TokenAbility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// ThrottleKey Value Object
// ============================================================================

/// Key scoping login throttling to one identifier from one origin
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey(String);

impl ThrottleKey {
  pub fn new(identifier: &LoginIdentifier, origin: &Origin) -> Self {
    Self(format!("{}|{}", identifier.normalized(), origin))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ThrottleKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

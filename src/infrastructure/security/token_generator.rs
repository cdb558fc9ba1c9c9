use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenGenerator;
use crate::domain::auth::value_objects::PlainTextToken;

const TOKEN_BYTES: usize = 32;

/// Secure token generator using cryptographically secure random number generation
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  pub fn new() -> Self {
    Self
  }
}

impl Default for SecureTokenGenerator {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl TokenGenerator for SecureTokenGenerator {
  /// Generates a 32-byte random token from the OS RNG, encoded base64url
  /// without padding for safe use in headers
  async fn generate(&self) -> Result<PlainTextToken, AuthError> {
    let mut token_bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut token_bytes);

    let token = URL_SAFE_NO_PAD.encode(token_bytes);

    Ok(PlainTextToken::from_string(token)?)
  }
}

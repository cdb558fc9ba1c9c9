//! User-facing messages in every supported locale

use crate::domain::portfolio::value_objects::Locale;

/// A translatable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
  InvalidCredentials,
  Throttled { seconds: u64 },
  Unauthenticated,
  Forbidden,
  FieldRequired { field: String },
  FieldInvalid { field: String },
  InvalidEmail,
  ProjectNotFound,
  Internal,
  LoggedOut,
}

impl Message {
  pub fn render(&self, locale: Locale) -> String {
    match locale {
      Locale::Es => self.spanish(),
      Locale::En => self.english(),
    }
  }

  fn spanish(&self) -> String {
    match self {
      Message::InvalidCredentials => {
        "Estas credenciales no coinciden con nuestros registros.".to_string()
      }
      Message::Throttled { seconds } => format!(
        "Demasiados intentos de acceso. Por favor intente nuevamente en {} segundos.",
        seconds
      ),
      Message::Unauthenticated => "No autenticado.".to_string(),
      Message::Forbidden => "No tiene permiso para realizar esta acción.".to_string(),
      Message::FieldRequired { field } => format!("El campo {} es obligatorio.", field),
      Message::FieldInvalid { field } => format!("El campo {} no es válido.", field),
      Message::InvalidEmail => {
        "El campo email debe ser una dirección de correo válida.".to_string()
      }
      Message::ProjectNotFound => "Proyecto no encontrado.".to_string(),
      Message::Internal => "Se produjo un error interno del servidor.".to_string(),
      Message::LoggedOut => "Sesión cerrada correctamente.".to_string(),
    }
  }

  fn english(&self) -> String {
    match self {
      Message::InvalidCredentials => "These credentials do not match our records.".to_string(),
      Message::Throttled { seconds } => format!(
        "Too many login attempts. Please try again in {} seconds.",
        seconds
      ),
      Message::Unauthenticated => "Unauthenticated.".to_string(),
      Message::Forbidden => "This action is unauthorized.".to_string(),
      Message::FieldRequired { field } => format!("The {} field is required.", field),
      Message::FieldInvalid { field } => format!("The {} field is invalid.", field),
      Message::InvalidEmail => "The email field must be a valid email address.".to_string(),
      Message::ProjectNotFound => "Project not found.".to_string(),
      Message::Internal => "An internal server error occurred.".to_string(),
      Message::LoggedOut => "Logged out successfully.".to_string(),
    }
  }
}

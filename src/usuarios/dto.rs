use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::Date;

use crate::error::AppError;
use crate::usuarios::repo_types::{date_format, UsuarioRole};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_min_len(value: &str, min: usize, message: &str) -> Result<(), AppError> {
    if value.trim().chars().count() < min {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Cuerpo de `POST /usuario`. Campos desconocidos se rechazan en la
/// deserialización; el resto de las restricciones vive en [`Self::validate`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUsuarioRequest {
    pub nombre: String,
    pub apellido: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(with = "date_format")]
    pub fecha_nacimiento: Date,
    pub descripcion: String,
    pub profile_image_url: Option<String>,
    pub role: Option<UsuarioRole>,
}

impl CreateUsuarioRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_min_len(&self.nombre, 2, "El nombre debe tener al menos 2 caracteres")?;
        check_min_len(&self.apellido, 2, "El apellido debe tener al menos 2 caracteres")?;
        check_min_len(&self.username, 3, "El username debe tener al menos 3 caracteres")?;
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("El email debe ser válido".into()));
        }
        if self.password.chars().count() < 8 {
            return Err(AppError::Validation(
                "La contraseña debe tener al menos 8 caracteres".into(),
            ));
        }
        check_min_len(
            &self.descripcion,
            10,
            "La descripción debe tener al menos 10 caracteres",
        )?;
        Ok(())
    }
}

/// Cuerpo de `PATCH /usuario/:id`. Mismas restricciones por campo que el
/// create, todas opcionales.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUsuarioRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, with = "date_format::option")]
    pub fecha_nacimiento: Option<Date>,
    pub descripcion: Option<String>,
    pub profile_image_url: Option<String>,
    pub role: Option<UsuarioRole>,
}

impl UpdateUsuarioRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(nombre) = &self.nombre {
            check_min_len(nombre, 2, "El nombre debe tener al menos 2 caracteres")?;
        }
        if let Some(apellido) = &self.apellido {
            check_min_len(apellido, 2, "El apellido debe tener al menos 2 caracteres")?;
        }
        if let Some(username) = &self.username {
            check_min_len(username, 3, "El username debe tener al menos 3 caracteres")?;
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(AppError::Validation("El email debe ser válido".into()));
            }
        }
        if let Some(password) = &self.password {
            if password.chars().count() < 8 {
                return Err(AppError::Validation(
                    "La contraseña debe tener al menos 8 caracteres".into(),
                ));
            }
        }
        if let Some(descripcion) = &self.descripcion {
            check_min_len(
                descripcion,
                10,
                "La descripción debe tener al menos 10 caracteres",
            )?;
        }
        Ok(())
    }
}

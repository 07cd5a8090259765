use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::usuarios::dto::{CreateUsuarioRequest, UpdateUsuarioRequest};
use crate::usuarios::password;
use crate::usuarios::repo::UsuarioRepository;
use crate::usuarios::repo_types::Usuario;

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Usuario con ID {id} no encontrado"))
}

/// Reglas de negocio sobre cuentas: unicidad de email/username, soft delete,
/// hashing de contraseñas y chequeos de existencia. Los chequeos de unicidad
/// consultan el repositorio crudo, por lo que las identidades de cuentas
/// soft-deleted siguen reservadas.
#[derive(Clone)]
pub struct UsuarioService {
    repo: UsuarioRepository,
}

impl UsuarioService {
    pub fn new(repo: UsuarioRepository) -> Self {
        Self { repo }
    }

    /// Todos los usuarios activos (sin `deleted_at`).
    pub async fn find_all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = self.repo.find_all().await?;
        Ok(usuarios
            .into_iter()
            .filter(|u| u.deleted_at.is_none())
            .collect())
    }

    /// `NotFound` si el id no existe o la cuenta está soft-deleted.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Usuario, AppError> {
        match self.repo.find_by_id(id).await? {
            Some(usuario) if usuario.deleted_at.is_none() => Ok(usuario),
            _ => Err(not_found(id)),
        }
    }

    /// `None` (no error) si no existe o está soft-deleted.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = self.repo.find_by_email(email).await?;
        Ok(usuario.filter(|u| u.deleted_at.is_none()))
    }

    /// `None` (no error) si no existe o está soft-deleted.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = self.repo.find_by_username(username).await?;
        Ok(usuario.filter(|u| u.deleted_at.is_none()))
    }

    pub async fn create(&self, input: CreateUsuarioRequest) -> Result<Usuario, AppError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("El email ya está registrado".into()));
        }
        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict("El username ya está en uso".into()));
        }

        let hashed = password::hash_password(&input.password)?;
        let now = OffsetDateTime::now_utc();
        let usuario = Usuario {
            id: Uuid::new_v4(),
            nombre: input.nombre,
            apellido: input.apellido,
            username: input.username,
            email: input.email,
            password: hashed,
            fecha_nacimiento: input.fecha_nacimiento,
            descripcion: input.descripcion,
            profile_image_url: input.profile_image_url,
            role: input.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        debug!(usuario_id = %usuario.id, username = %usuario.username, "creating usuario");
        self.repo.create(usuario).await
    }

    /// Reemplazo parcial. La búsqueda es por id crudo, así que una cuenta
    /// soft-deleted también es actualizable (lo usa el propio soft delete).
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUsuarioRequest,
    ) -> Result<Usuario, AppError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(email) = input.email.as_deref() {
            if email != current.email {
                if let Some(otro) = self.repo.find_by_email(email).await? {
                    if otro.id != id {
                        return Err(AppError::Conflict(
                            "El email ya está registrado por otro usuario".into(),
                        ));
                    }
                }
            }
        }

        if let Some(username) = input.username.as_deref() {
            if username != current.username {
                if let Some(otro) = self.repo.find_by_username(username).await? {
                    if otro.id != id {
                        return Err(AppError::Conflict(
                            "El username ya está en uso por otro usuario".into(),
                        ));
                    }
                }
            }
        }

        let password = match input.password.as_deref() {
            Some(plain) => password::hash_password(plain)?,
            None => current.password.clone(),
        };

        let actualizado = Usuario {
            id: current.id,
            nombre: input.nombre.unwrap_or(current.nombre),
            apellido: input.apellido.unwrap_or(current.apellido),
            username: input.username.unwrap_or(current.username),
            email: input.email.unwrap_or(current.email),
            password,
            fecha_nacimiento: input.fecha_nacimiento.unwrap_or(current.fecha_nacimiento),
            descripcion: input.descripcion.unwrap_or(current.descripcion),
            profile_image_url: input.profile_image_url.or(current.profile_image_url),
            role: input.role.unwrap_or(current.role),
            created_at: current.created_at,
            updated_at: OffsetDateTime::now_utc(),
            deleted_at: current.deleted_at,
        };

        self.repo.update(actualizado).await
    }

    /// Soft delete. `NotFound` si no existe o ya estaba eliminado.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or_else(|| not_found(id))?;

        let now = OffsetDateTime::now_utc();
        let eliminado = Usuario {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        };
        self.repo.update(eliminado).await?;
        Ok(())
    }

    /// Revierte un soft delete. `Conflict` si la cuenta no estaba eliminada.
    pub async fn restore(&self, id: Uuid) -> Result<Usuario, AppError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if current.deleted_at.is_none() {
            return Err(AppError::Conflict("El usuario no está eliminado".into()));
        }

        let restaurado = Usuario {
            deleted_at: None,
            updated_at: OffsetDateTime::now_utc(),
            ..current
        };
        self.repo.update(restaurado).await
    }

    /// Borrado físico definitivo, esté o no soft-deleted. Sin ruta HTTP; sólo
    /// para casos excepcionales.
    pub async fn hard_delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }
        self.repo.delete(id).await?;
        Ok(())
    }

    pub fn validate_password(&self, plain: &str, hash: &str) -> Result<bool, AppError> {
        Ok(password::verify_password(plain, hash)?)
    }
}

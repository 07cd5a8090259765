use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::store::UsuarioStore;
use crate::usuarios::repo_types::Usuario;

/// Delegación pura hacia el data store configurado. Sin reglas de negocio.
#[derive(Clone)]
pub struct UsuarioRepository {
    store: Arc<dyn UsuarioStore>,
}

impl UsuarioRepository {
    pub fn new(store: Arc<dyn UsuarioStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Usuario>, AppError> {
        self.store.find_all().await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        self.store.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        self.store.find_by_email(email).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        self.store.find_by_username(username).await
    }

    pub async fn create(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        self.store.create(usuario).await
    }

    pub async fn update(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        self.store.update(usuario).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Vec<Usuario>, AppError> {
        self.store.delete(id).await
    }
}

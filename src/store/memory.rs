use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::UsuarioStore;
use crate::usuarios::repo_types::Usuario;

/// Adaptador de referencia: una colección mutable en memoria con búsqueda
/// lineal. Correcto sólo bajo un escritor a la vez; el lock serializa cada
/// operación individual, no flujos de varias operaciones.
#[derive(Default)]
pub struct MemoryStore {
    usuarios: RwLock<Vec<Usuario>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Usuario con ID {id} no encontrado"))
}

#[async_trait]
impl UsuarioStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Usuario>, AppError> {
        Ok(self.usuarios.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuarios = self.usuarios.read().await;
        Ok(usuarios.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuarios = self.usuarios.read().await;
        Ok(usuarios.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let usuarios = self.usuarios.read().await;
        Ok(usuarios.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        let mut usuarios = self.usuarios.write().await;
        usuarios.push(usuario.clone());
        Ok(usuario)
    }

    async fn update(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        let mut usuarios = self.usuarios.write().await;
        match usuarios.iter_mut().find(|u| u.id == usuario.id) {
            Some(slot) => {
                *slot = usuario.clone();
                Ok(usuario)
            }
            None => Err(not_found(usuario.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Vec<Usuario>, AppError> {
        let mut usuarios = self.usuarios.write().await;
        let index = usuarios
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| not_found(id))?;
        usuarios.remove(index);
        Ok(usuarios.clone())
    }
}

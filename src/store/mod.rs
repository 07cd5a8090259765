use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::usuarios::repo_types::Usuario;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Puerto entre el repositorio y el almacenamiento real. Las búsquedas NO
/// filtran registros soft-deleted; esa política vive en la capa de servicio.
#[async_trait]
pub trait UsuarioStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Usuario>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError>;

    async fn create(&self, usuario: Usuario) -> Result<Usuario, AppError>;

    /// Reemplaza el registro completo. `NotFound` si el id no existe.
    async fn update(&self, usuario: Usuario) -> Result<Usuario, AppError>;

    /// Borrado físico. Devuelve los registros restantes; `NotFound` si el id
    /// no existe.
    async fn delete(&self, id: Uuid) -> Result<Vec<Usuario>, AppError>;
}

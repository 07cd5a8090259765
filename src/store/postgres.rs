use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::AppError;
use crate::store::UsuarioStore;
use crate::usuarios::repo_types::{Usuario, UsuarioRole};

const COLUMNS: &str = "id, nombre, apellido, username, email, password, fecha_nacimiento, \
     descripcion, profile_image_url, role, created_at, updated_at, deleted_at";

/// Adaptador de producción sobre Postgres. La unicidad de email/username se
/// refuerza además con constraints UNIQUE sobre todas las filas, así las
/// identidades soft-deleted siguen reservadas ante escritores concurrentes.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;

        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct UsuarioRow {
    id: Uuid,
    nombre: String,
    apellido: String,
    username: String,
    email: String,
    password: String,
    fecha_nacimiento: Date,
    descripcion: String,
    profile_image_url: Option<String>,
    role: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    deleted_at: Option<OffsetDateTime>,
}

impl From<UsuarioRow> for Usuario {
    fn from(row: UsuarioRow) -> Self {
        Usuario {
            id: row.id,
            nombre: row.nombre,
            apellido: row.apellido,
            username: row.username,
            email: row.email,
            password: row.password,
            fecha_nacimiento: row.fecha_nacimiento,
            descripcion: row.descripcion,
            profile_image_url: row.profile_image_url,
            role: UsuarioRole::from_db(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl UsuarioStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Usuario>, AppError> {
        let rows = sqlx::query_as::<_, UsuarioRow>(&format!(
            "SELECT {COLUMNS} FROM usuarios ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Usuario::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "SELECT {COLUMNS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Usuario::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "SELECT {COLUMNS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Usuario::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "SELECT {COLUMNS} FROM usuarios WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Usuario::from))
    }

    async fn create(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "INSERT INTO usuarios (id, nombre, apellido, username, email, password, \
                 fecha_nacimiento, descripcion, profile_image_url, role, created_at, \
                 updated_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        ))
        .bind(usuario.id)
        .bind(&usuario.nombre)
        .bind(&usuario.apellido)
        .bind(&usuario.username)
        .bind(&usuario.email)
        .bind(&usuario.password)
        .bind(usuario.fecha_nacimiento)
        .bind(&usuario.descripcion)
        .bind(&usuario.profile_image_url)
        .bind(usuario.role.as_str())
        .bind(usuario.created_at)
        .bind(usuario.updated_at)
        .bind(usuario.deleted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, usuario: Usuario) -> Result<Usuario, AppError> {
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "UPDATE usuarios
             SET nombre = $2, apellido = $3, username = $4, email = $5, password = $6,
                 fecha_nacimiento = $7, descripcion = $8, profile_image_url = $9,
                 role = $10, updated_at = $11, deleted_at = $12
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(usuario.id)
        .bind(&usuario.nombre)
        .bind(&usuario.apellido)
        .bind(&usuario.username)
        .bind(&usuario.email)
        .bind(&usuario.password)
        .bind(usuario.fecha_nacimiento)
        .bind(&usuario.descripcion)
        .bind(&usuario.profile_image_url)
        .bind(usuario.role.as_str())
        .bind(usuario.updated_at)
        .bind(usuario.deleted_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Usuario::from).ok_or_else(|| {
            AppError::NotFound(format!("Usuario con ID {} no encontrado", usuario.id))
        })
    }

    async fn delete(&self, id: Uuid) -> Result<Vec<Usuario>, AppError> {
        let deleted: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM usuarios WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!(
                "Usuario con ID {id} no encontrado"
            )));
        }

        self.find_all().await
    }
}

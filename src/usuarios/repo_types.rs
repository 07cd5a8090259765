use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Rol de una cuenta dentro de la red.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UsuarioRole {
    #[default]
    User,
    Admin,
}

impl UsuarioRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UsuarioRole::User => "USER",
            UsuarioRole::Admin => "ADMIN",
        }
    }

    pub fn from_db(raw: &str) -> Self {
        match raw {
            "ADMIN" => UsuarioRole::Admin,
            _ => UsuarioRole::User,
        }
    }
}

/// Registro canónico de una cuenta. El data store es su único dueño; la capa
/// de servicio sólo maneja copias acotadas a la request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub username: String,
    pub email: String,
    /// Hash argon2; nunca sale en JSON.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(with = "date_format")]
    pub fecha_nacimiento: Date,
    pub descripcion: String,
    pub profile_image_url: Option<String>,
    pub role: UsuarioRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Marca de soft delete; `Some` excluye la cuenta de las consultas activas.
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// Serde para fechas planas "YYYY-MM-DD" (fechaNacimiento).
pub(crate) mod date_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| Date::parse(&raw, super::FORMAT).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

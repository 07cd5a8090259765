use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::usuarios::dto::{CreateUsuarioRequest, UpdateUsuarioRequest};
use crate::usuarios::repo_types::Usuario;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usuario", get(find_all).post(create))
        .route("/usuario/email/:email", get(find_by_email))
        .route("/usuario/username/:username", get(find_by_username))
        .route("/usuario/:id", get(find_by_id).patch(update).delete(delete))
        .route("/usuario/:id/restore", patch(restore))
}

#[instrument(skip(state))]
async fn find_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Usuario>>>, AppError> {
    let usuarios = state.service.find_all().await?;
    let message = if usuarios.is_empty() {
        "No hay usuarios registrados"
    } else {
        "Usuarios encontrados"
    };
    Ok(Json(ApiResponse::success(usuarios, message)))
}

#[instrument(skip(state))]
async fn find_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let usuario = state
        .service
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;
    Ok(Json(ApiResponse::success(usuario, "Usuario encontrado")))
}

#[instrument(skip(state))]
async fn find_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let usuario = state
        .service
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;
    Ok(Json(ApiResponse::success(usuario, "Usuario encontrado")))
}

#[instrument(skip(state))]
async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let usuario = state.service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success(usuario, "Usuario encontrado")))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUsuarioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Usuario>>), AppError> {
    payload.validate()?;
    let usuario = state.service.create(payload).await?;
    info!(usuario_id = %usuario.id, username = %usuario.username, "usuario creado");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(usuario, "Usuario creado exitosamente")),
    ))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateUsuarioRequest>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    payload.validate()?;
    let usuario = state.service.update(id, payload).await?;
    Ok(Json(ApiResponse::success(
        usuario,
        "Usuario actualizado exitosamente",
    )))
}

#[instrument(skip(state))]
async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.service.delete(id).await?;
    info!(usuario_id = %id, "usuario eliminado (soft)");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn restore(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let usuario = state.service.restore(id).await?;
    info!(usuario_id = %id, "usuario restaurado");
    Ok(Json(ApiResponse::success(
        usuario,
        "Usuario restaurado exitosamente",
    )))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::state::AppState;

    fn test_app() -> Router {
        build_app(AppState::in_memory())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn juan() -> Value {
        json!({
            "nombre": "Juan",
            "apellido": "Pérez",
            "username": "juan123",
            "email": "juan@example.com",
            "password": "MiPassword123",
            "fechaNacimiento": "1990-05-15",
            "descripcion": "Desarrollador full stack apasionado"
        })
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_then_list_wraps_in_envelope() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request("POST", "/usuario", juan()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Usuario creado exitosamente");
        assert_eq!(body["data"]["username"], "juan123");
        assert!(body["data"].get("password").is_none(), "password must never leave the API");

        let response = app.oneshot(get_request("/usuario")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["message"], "Usuarios encontrados");
    }

    #[tokio::test]
    async fn empty_list_message() {
        let response = test_app().oneshot(get_request("/usuario")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "No hay usuarios registrados");
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn invalid_payload_is_400() {
        let mut body = juan();
        body["password"] = json!("corta");
        let response = test_app()
            .oneshot(json_request("POST", "/usuario", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn unknown_field_is_400() {
        let mut body = juan();
        body["admin"] = json!(true);
        let response = test_app()
            .oneshot(json_request("POST", "/usuario", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_username_is_409() {
        let app = test_app();
        app.clone()
            .oneshot(json_request("POST", "/usuario", juan()))
            .await
            .unwrap();

        let mut segundo = juan();
        segundo["email"] = json!("otro@example.com");
        let response = app
            .oneshot(json_request("POST", "/usuario", segundo))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Conflict");
        assert_eq!(body["message"], "El username ya está en uso");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_the_service() {
        let response = test_app()
            .oneshot(get_request("/usuario/no-es-un-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lookup_endpoints_return_404_when_absent() {
        let app = test_app();
        for uri in [
            "/usuario/email/nadie@example.com",
            "/usuario/username/nadie",
            "/usuario/550e8400-e29b-41d4-a716-446655440000",
        ] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn soft_delete_restore_flow() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request("POST", "/usuario", juan()))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        // DELETE → 204 sin cuerpo.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/usuario/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Desaparece de la vista activa.
        let response = app.clone().oneshot(get_request("/usuario")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/usuario/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Restore lo trae de vuelta con el mismo id.
        let response = app
            .clone()
            .oneshot(json_request("PATCH", &format!("/usuario/{id}/restore"), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["id"], id.as_str());

        let response = app.oneshot(get_request("/usuario")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn restore_active_user_is_409() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/usuario", juan()))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request("PATCH", &format!("/usuario/{id}/restore"), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["message"], "El usuario no está eliminado");
    }

    #[tokio::test]
    async fn patch_updates_only_supplied_fields() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/usuario", juan()))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/usuario/{id}"),
                json!({ "descripcion": "Una biografía totalmente nueva" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["descripcion"], "Una biografía totalmente nueva");
        assert_eq!(body["data"]["username"], "juan123");
        assert_eq!(body["data"]["email"], "juan@example.com");
    }
}

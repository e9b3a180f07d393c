//! API routes

use axum::{
    extract::State,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::extractors::AppState;
use crate::handlers::{
    audit, auth, events, execution, library, marches, projects, reference, transfer, trash, users,
};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .merge(auth_router())
        .merge(projects_router())
        .merge(marches_router())
        .merge(execution_router())
        .merge(trash_router())
        .merge(library_router())
        .merge(reference_router())
        .merge(users_router())
        .route("/audit", get(audit::list_entries))
        .route("/import/template", get(transfer::download_template))
        .route("/events", get(events::change_feed))
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", post(auth::change_password))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/:id/summary", get(projects::project_summary))
        .route(
            "/projects/:id/plan",
            put(projects::attach_signed_plan)
                .get(projects::download_signed_plan)
                .delete(projects::remove_signed_plan),
        )
        .route("/projects/:id/import", post(transfer::import_marches))
        .route("/projects/:id/export", get(transfer::export_marches))
}

fn marches_router() -> Router<AppState> {
    Router::new()
        .route(
            "/marches",
            get(marches::list_marches).post(marches::create_marche),
        )
        .route(
            "/marches/:id",
            get(marches::get_marche)
                .patch(marches::update_marche)
                .delete(marches::delete_marche),
        )
        .route("/marches/:id/status", get(marches::get_status))
        .route("/marches/:id/phases", get(marches::get_phases))
        .route("/marches/:id/dates/:kind", put(marches::set_dates))
        .route("/marches/:id/flags", patch(marches::update_flags))
        .route(
            "/marches/:id/documents/:slot",
            put(marches::attach_document)
                .get(marches::download_document)
                .delete(marches::remove_document),
        )
}

fn execution_router() -> Router<AppState> {
    Router::new()
        .route("/marches/:id/execution/contract", put(execution::set_contract))
        .route(
            "/marches/:id/execution/deliveries",
            post(execution::add_delivery_document),
        )
        .route("/marches/:id/execution/decomptes", post(execution::add_decompte))
        .route(
            "/marches/:id/execution/decomptes/:numero",
            patch(execution::set_decompte_paid).delete(execution::remove_decompte),
        )
        .route("/marches/:id/execution/avenants", post(execution::add_avenant))
        .route(
            "/marches/:id/execution/avenants/:numero",
            axum::routing::delete(execution::remove_avenant),
        )
        .route(
            "/marches/:id/execution/termination",
            post(execution::advance_termination),
        )
}

fn trash_router() -> Router<AppState> {
    Router::new()
        .route("/trash", get(trash::list_trash).delete(trash::empty))
        .route("/trash/:id", axum::routing::delete(trash::purge))
        .route("/trash/:id/restore", post(trash::restore))
}

fn library_router() -> Router<AppState> {
    Router::new()
        .route(
            "/library",
            get(library::list_documents).post(library::create_document),
        )
        .route(
            "/library/:id",
            get(library::get_document).delete(library::delete_document),
        )
        .route("/library/:id/download", get(library::download_document))
}

fn reference_router() -> Router<AppState> {
    Router::new()
        .route("/reference", get(reference::list_all))
        .route(
            "/reference/:kind",
            get(reference::get_one)
                .post(reference::add_value)
                .patch(reference::rename_value),
        )
        .route(
            "/reference/:kind/:value",
            axum::routing::delete(reference::remove_value),
        )
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

async fn api_root(State(state): State<AppState>) -> Json<ApiRoot> {
    Json(ApiRoot {
        type_name: "Root",
        app_title: state.info.app_title.clone(),
        version: state.info.version.clone(),
        store: state.services.store().backend(),
    })
}

#[derive(Serialize)]
struct ApiRoot {
    #[serde(rename = "_type")]
    type_name: &'static str,
    #[serde(rename = "appTitle")]
    app_title: String,
    version: String,
    store: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::InstanceInfo;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use edc_auth::JwtService;
    use edc_core::config::BootstrapAdmin;
    use edc_models::{Role, User};
    use edc_services::{ServiceContext, ServiceSettings};
    use edc_store::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &[u8] = b"test-secret-key-for-the-router-tests";

    fn state() -> AppState {
        let services = ServiceContext::new(Arc::new(MemoryStore::new()), ServiceSettings::default());
        AppState::new(services, JwtService::new(SECRET, 3600), InstanceInfo::default())
    }

    async fn token_for(state: &AppState, role: Role) -> String {
        let user = User::new(format!("{} user", role.as_str()), format!("{}@edc.cm", role.as_str().to_lowercase()), role);
        state.services.users.save(&user).await.unwrap();
        state.jwt.create_token(&user).unwrap()
    }

    async fn send(state: &AppState, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        router()
            .with_state(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_api_root_is_public() {
        let state = state();
        let response = send(&state, Method::GET, "/api/v1", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["_type"], "Root");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_requests_without_token_are_rejected() {
        let state = state();
        let response = send(&state, Method::GET, "/api/v1/projects", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "unauthorized");

        let response = send(&state, Method::GET, "/api/v1/projects", Some("garbage"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let state = state();
        let admin = BootstrapAdmin {
            name: "Administrateur".into(),
            email: "admin@edc.cm".into(),
            password: "changeme123".into(),
        };
        edc_services::auth::bootstrap_admin(&state.services, &admin)
            .await
            .unwrap();

        let response = send(
            &state,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin@edc.cm", "password": "wrong-password"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &state,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "Admin@EDC.cm", "password": "changeme123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert!(body["user"].get("password_hash").is_none());
        let token = body["token"].as_str().unwrap().to_string();

        let me = json_body(send(&state, Method::GET, "/api/v1/auth/me", Some(&token), None).await).await;
        assert_eq!(me["role"], "SUPER_ADMIN");
        assert_eq!(me["email"], "admin@edc.cm");
    }

    #[tokio::test]
    async fn test_project_and_marche_lifecycle() {
        let state = state();
        let token = token_for(&state, Role::SuperAdmin).await;

        let response = send(
            &state,
            Method::POST,
            "/api/v1/projects",
            Some(&token),
            Some(json!({"name": "PPM 2025", "fiscal_year": 2025})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let project_id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = send(
            &state,
            Method::POST,
            "/api/v1/marches",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "numero_dossier": "DOS-001",
                "objet": "Fourniture de compteurs",
                "montant_prevu": 1500000.0
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["status"]["label"], "Registered in plan");
        let marche_id = created["id"].as_str().unwrap().to_string();

        let list = json_body(
            send(&state, Method::GET, &format!("/api/v1/marches?project_id={}", project_id), Some(&token), None).await,
        )
        .await;
        assert_eq!(list["total"], 1);

        let response = send(&state, Method::DELETE, &format!("/api/v1/marches/{}", marche_id), Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let list = json_body(send(&state, Method::GET, "/api/v1/marches", Some(&token), None).await).await;
        assert_eq!(list["total"], 0);
        let trash = json_body(send(&state, Method::GET, "/api/v1/trash", Some(&token), None).await).await;
        assert_eq!(trash.as_array().unwrap().len(), 1);

        let response = send(
            &state,
            Method::POST,
            &format!("/api/v1/trash/{}/restore", marche_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_validation_errors_are_unprocessable() {
        let state = state();
        let token = token_for(&state, Role::SuperAdmin).await;
        let response = send(
            &state,
            Method::POST,
            "/api/v1/projects",
            Some(&token),
            Some(json!({"name": "", "fiscal_year": 2025})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(!body["details"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_viewer_cannot_create_projects() {
        let state = state();
        let token = token_for(&state, Role::Viewer).await;
        let response = send(
            &state,
            Method::POST,
            "/api/v1/projects",
            Some(&token),
            Some(json!({"name": "PPM", "fiscal_year": 2025})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_reference_registry_is_bad_request() {
        let state = state();
        let token = token_for(&state, Role::SuperAdmin).await;
        let response = send(&state, Method::GET, "/api/v1/reference/colours", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&state, Method::GET, "/api/v1/reference/ao_types", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_milestone_is_bad_request() {
        let state = state();
        let token = token_for(&state, Role::SuperAdmin).await;
        let uri = format!("/api/v1/marches/{}/dates/realized", uuid::Uuid::new_v4());
        let response = send(
            &state,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"dates": {"not_a_milestone": "2025-01-01"}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_import_template_is_csv() {
        let state = state();
        let token = token_for(&state, Role::Agent).await;
        let response = send(&state, Method::GET, "/api/v1/import/template", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/csv"));
    }
}

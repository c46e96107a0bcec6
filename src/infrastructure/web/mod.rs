//! Web 服务器模块
//!
//! 提供角色与员工目录的 HTTP/JSON API。
//! 请求方的当前角色由 `X-Role-Id` 头给出（角色切换器的客户端选择）。

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::application::{Services, SessionContext};
use crate::core::store::UserFilter;
use crate::domain::{CreateRoleInput, CreateUserInput, UpdateRoleInput, UpdateUserInput, UserStatus};
use crate::errors::HrmsError;
use crate::infrastructure::logger::Timer;

/// 当前角色请求头
pub const ROLE_HEADER: &str = "x-role-id";

// ==================== 错误响应 ====================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 缺少或无法识别的当前角色
    Unauthorized(String),
    Domain(HrmsError),
}

impl From<HrmsError> for ApiError {
    fn from(err: HrmsError) -> Self {
        ApiError::Domain(err)
    }
}

fn status_of(err: &HrmsError) -> StatusCode {
    match err {
        HrmsError::NotFound(_) | HrmsError::RoleNotFound(_) => StatusCode::NOT_FOUND,
        HrmsError::DuplicateEmail(_)
        | HrmsError::DuplicateRole(_)
        | HrmsError::DefaultRoleProtected(_)
        | HrmsError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
        HrmsError::InvalidPermission(_) | HrmsError::Validation(_) => StatusCode::BAD_REQUEST,
        HrmsError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        HrmsError::Storage(_) | HrmsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Domain(err) => {
                let status = status_of(&err);
                if status.is_server_error() {
                    error!("Request failed: {}", err);
                }
                (status, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

type ApiResult = Result<Response, ApiError>;

fn ok<T: Serialize>(data: T) -> Response {
    Json(serde_json::json!({
        "success": true,
        "data": data
    }))
    .into_response()
}

fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ok(data)).into_response()
}

// ==================== 状态 ====================

pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

// ==================== 请求类型 ====================

/// 用户列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub q: Option<String>,
    pub limit: Option<usize>,
}

impl UserQuery {
    fn into_filter(self) -> Result<UserFilter, HrmsError> {
        let mut filter = UserFilter::new();
        if let Some(role) = self.role {
            filter = filter.role(role);
        }
        if let Some(status) = self.status {
            let status: UserStatus = status.parse().map_err(HrmsError::Validation)?;
            filter = filter.status(status);
        }
        if let Some(department) = self.department {
            filter = filter.department(department);
        }
        if let Some(q) = self.q {
            filter = filter.search(q);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        Ok(filter)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role_id: String,
}

// ==================== 会话 ====================

/// 从请求头解析当前角色
async fn acting_session(state: &AppState, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
    let role_id = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-Role-Id header".to_string()))?;

    let mut session = SessionContext::new();
    if let Err(err) = session.set_role(&state.services.roles, role_id).await {
        return Err(match err {
            HrmsError::RoleNotFound(id) => ApiError::Unauthorized(format!("Unknown role: {}", id)),
            other => other.into(),
        });
    }
    Ok(session)
}

/// 当前角色必须拥有指定权限
async fn authorize(state: &AppState, headers: &HeaderMap, permission: &str) -> Result<(), ApiError> {
    let session = acting_session(state, headers).await?;
    session.require(permission)?;
    Ok(())
}

// ==================== 处理器 ====================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

async fn list_roles(State(state): State<Arc<AppState>>) -> ApiResult {
    let roles = state.services.roles.get_roles().await?;
    Ok(ok(roles))
}

async fn get_role(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    match state.services.roles.get_role_by_id(&id).await? {
        Some(role) => Ok(ok(role)),
        None => Err(HrmsError::RoleNotFound(id).into()),
    }
}

async fn create_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<CreateRoleInput>,
) -> ApiResult {
    let _timer = Timer::new("create_role");
    authorize(&state, &headers, "roles.manage").await?;
    let role = state.services.roles.create_role(input).await?;
    Ok(created(role))
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<UpdateRoleInput>,
) -> ApiResult {
    authorize(&state, &headers, "roles.manage").await?;
    let role = state.services.roles.update_role(&id, patch).await?;
    Ok(ok(role))
}

async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers, "roles.manage").await?;
    state.services.roles.delete_role(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> ApiResult {
    authorize(&state, &headers, "employees.view").await?;
    let filter = query.into_filter()?;
    let users = state.services.users.find_users(filter).await?;
    Ok(ok(users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers, "employees.view").await?;
    match state.services.users.get_user_by_id(&id).await? {
        Some(user) => Ok(ok(user)),
        None => Err(HrmsError::NotFound(id).into()),
    }
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<CreateUserInput>,
) -> ApiResult {
    let _timer = Timer::new("create_user");
    authorize(&state, &headers, "employees.create").await?;
    let user = state.services.users.create_user(input).await?;
    Ok(created(user))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<UpdateUserInput>,
) -> ApiResult {
    let _timer = Timer::new("update_user");
    authorize(&state, &headers, "employees.edit").await?;
    let user = state.services.users.update_user(&id, patch).await?;
    Ok(ok(user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers, "employees.delete").await?;
    state.services.users.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn activate_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers, "employees.edit").await?;
    let user = state.services.users.activate_user(&id).await?;
    Ok(ok(user))
}

async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&state, &headers, "employees.edit").await?;
    let user = state.services.users.deactivate_user(&id).await?;
    Ok(ok(user))
}

async fn assign_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<AssignRoleRequest>,
) -> ApiResult {
    authorize(&state, &headers, "roles.assign").await?;
    let user = state
        .services
        .users
        .assign_user_role(&id, &request.role_id)
        .await?;
    Ok(ok(user))
}

/// 当前角色是否拥有某权限
async fn check_permission(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let session = acting_session(&state, &headers).await?;
    let role_id = session.current_role().map(|r| r.id.clone());
    Ok(ok(serde_json::json!({
        "roleId": role_id,
        "permission": key,
        "granted": session.can(&key),
    })))
}

// ==================== 路由 ====================

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/roles", get(list_roles).post(create_role))
        .route(
            "/api/roles/{id}",
            get(get_role).patch(update_role).delete(delete_role),
        )
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/activate", post(activate_user))
        .route("/api/users/{id}/deactivate", post(deactivate_user))
        .route("/api/users/{id}/role", put(assign_role))
        .route("/api/auth/permissions/{key}", get(check_permission))
        .layer(cors)
        .with_state(state)
}

// ==================== 服务器启动 ====================

pub async fn start_web_server(bind_addr: &str, services: Services) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(services));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Web server started on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! # ApiClient: typed access to the task-management API
//!
//! [`ApiClient`] wraps a [`Transport`] and a [`Session`]. Every call is sent with the
//! session's bearer token and its envelope is decoded with the lenient helpers from
//! [`resolver::envelope`].
//!
//! ## Authentication failures
//!
//! A `401` on any call other than login/register/refresh triggers **one** refresh:
//!
//! 1. `POST /auth/refresh` with the stored refresh token.
//! 2. On success the new tokens are stored and the original request is retried once.
//! 3. If there is no refresh token, the refresh fails, or the retry is rejected again,
//!    the session is cleared and the call fails with [`ApiError::SessionExpired`]
//!    (or [`ApiError::Unauthorized`] when there was nothing to refresh with).
//!
//! Refreshes are serialized. When several concurrent calls are rejected with the same
//! token only the first one refreshes; the rest retry with its result.
//!
//! ## Endpoints
//!
//! | Area | Methods |
//! |------|---------|
//! | Auth | [`login`](ApiClient::login), [`register`](ApiClient::register), [`logout`](ApiClient::logout), [`restore`](ApiClient::restore), [`profile`](ApiClient::profile), [`update_profile`](ApiClient::update_profile), [`change_password`](ApiClient::change_password) |
//! | Users | [`users`](ApiClient::users) |
//! | Projects | [`projects`](ApiClient::projects), [`project`](ApiClient::project), [`create_project`](ApiClient::create_project), [`update_project`](ApiClient::update_project), [`delete_project`](ApiClient::delete_project), [`project_stats`](ApiClient::project_stats) |
//! | Tasks | [`tasks`](ApiClient::tasks), [`my_tasks`](ApiClient::my_tasks), [`task`](ApiClient::task), [`create_task`](ApiClient::create_task), [`update_task`](ApiClient::update_task), [`update_task_status`](ApiClient::update_task_status), [`delete_task`](ApiClient::delete_task), [`add_comment`](ApiClient::add_comment) |
//! | Analytics | [`dashboard_analytics`](ApiClient::dashboard_analytics), [`project_analytics`](ApiClient::project_analytics), [`team_analytics`](ApiClient::team_analytics) |

use std::rc::Rc;

use resolver::envelope::{
    decode_collection, decode_entity, error_message, pagination, ApiEnvelope, Pagination,
    PROJECTS_KEY, TASKS_KEY, USERS_KEY,
};
use resolver::form::{validate_comment, ProjectForm, TaskForm, TaskPatch};
use resolver::{DashboardAnalytics, Project, ProjectQuery, Task, TaskComment, TaskQuery, TaskStatus, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::session::{Session, Tokens};
use crate::transport::{ApiRequest, RawResponse, Transport};

const UNAUTHORIZED: u16 = 401;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Fields a user may change on their own profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    user: User,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// One page of a collection endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }
}

/// `GET /projects/{id}` answers with the project and its tasks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectDetail {
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// Optional `startDate`/`endDate` bounds for the analytics reports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        [("startDate", &self.start_date), ("endDate", &self.end_date)]
            .into_iter()
            .filter_map(|(k, v)| v.clone().filter(|v| !v.is_empty()).map(|v| (k, v)))
            .collect()
    }
}

#[derive(Clone)]
pub struct ApiClient<T> {
    transport: T,
    session: Session,
    refresh_lock: Rc<Mutex<()>>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, session: Session) -> Self {
        Self {
            transport,
            session,
            refresh_lock: Rc::new(Mutex::new(())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Request pipeline
    // -----------------------------------------------------------------------

    async fn send_authorized(&self, mut request: ApiRequest) -> Result<RawResponse, ApiError> {
        request.bearer = self.session.access_token().await;
        tracing::debug!("{} {}", request.method.as_str(), request.path);
        self.transport.send(request).await
    }

    /// Send without any refresh handling; used for the auth endpoints themselves.
    async fn execute_plain(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.send_authorized(request).await?;
        check(response)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let rejected_token = self.session.access_token().await;
        let response = self.send_authorized(request.clone()).await?;
        if response.status != UNAUTHORIZED {
            return check(response);
        }

        if let Err(e) = self.recover(rejected_token.as_deref()).await {
            self.force_logout().await;
            return Err(e);
        }

        let retried = self.send_authorized(request).await?;
        if retried.status == UNAUTHORIZED {
            tracing::warn!("Request rejected again after refresh");
            self.force_logout().await;
            return Err(ApiError::SessionExpired);
        }
        check(retried)
    }

    /// Obtain a usable access token after `rejected` was refused.
    async fn recover(&self, rejected: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.session.access_token().await;
        if current.is_some() && current.as_deref() != rejected {
            // Another call refreshed while this one waited.
            return Ok(());
        }
        let Some(refresh_token) = self.session.refresh_token().await else {
            return Err(ApiError::Unauthorized);
        };

        tracing::info!("Access token rejected, refreshing");
        let request = ApiRequest::post("/auth/refresh").json(json!({ "refreshToken": refresh_token }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "Token refresh failed");
            return Err(ApiError::SessionExpired);
        }

        let mut tokens: Tokens =
            decode_entity(&response.body, "tokens").ok_or(ApiError::SessionExpired)?;
        if tokens.access_token.is_empty() {
            return Err(ApiError::SessionExpired);
        }
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }
        self.session.set_tokens(tokens).await;
        Ok(())
    }

    async fn force_logout(&self) {
        tracing::warn!("Session could not be recovered, signing out");
        self.session.clear().await;
    }

    async fn get_entity<E: DeserializeOwned>(&self, request: ApiRequest, key: &str) -> Result<E, ApiError> {
        let body = self.execute(request).await?;
        entity(&body, key)
    }

    async fn get_listing<E: DeserializeOwned>(&self, request: ApiRequest, key: &str) -> Result<Listing<E>, ApiError> {
        let body = self.execute(request).await?;
        Ok(Listing {
            items: decode_collection(&body, key),
            pagination: pagination(&body),
        })
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        let request = ApiRequest::post("/auth/login").json(serde_json::to_value(credentials)?);
        let body = self.execute_plain(request).await?;
        self.sign_in(&body).await
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let request = ApiRequest::post("/auth/register").json(serde_json::to_value(data)?);
        let body = self.execute_plain(request).await?;
        self.sign_in(&body).await
    }

    async fn sign_in(&self, body: &Value) -> Result<User, ApiError> {
        let envelope: ApiEnvelope<AuthPayload> = serde_json::from_value(body.clone())?;
        let payload = envelope
            .data
            .ok_or_else(|| ApiError::Decode("auth response without data".into()))?;
        let tokens = Tokens::new(payload.access_token, payload.refresh_token);
        self.session.sign_in(tokens, payload.user.clone()).await;
        tracing::info!(user = %payload.user.id, "Signed in");
        Ok(payload.user)
    }

    /// Tell the server, then forget the session locally whatever it answered.
    pub async fn logout(&self) {
        if self.session.has_tokens().await {
            if let Err(e) = self.execute_plain(ApiRequest::post("/auth/logout")).await {
                tracing::debug!("Ignoring logout failure: {e}");
            }
        }
        self.session.clear().await;
    }

    /// Pick up a stored session on startup. Returns the signed-in user, or `None`
    /// when there is no session or it is no longer valid (in which case it is cleared).
    pub async fn restore(&self) -> Option<User> {
        if !self.session.has_tokens().await {
            return None;
        }
        match self.profile().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Could not restore session: {e}");
                self.logout().await;
                None
            }
        }
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        let user: User = self.get_entity(ApiRequest::get("/auth/profile"), "user").await?;
        self.session.set_user(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let request = ApiRequest::put("/auth/profile").json(serde_json::to_value(update)?);
        let user: User = self.get_entity(request, "user").await?;
        self.session.set_user(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), ApiError> {
        let request = ApiRequest::put("/auth/change-password").json(json!({
            "currentPassword": current_password,
            "newPassword": new_password,
        }));
        self.execute(request).await.map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let body = self.execute(ApiRequest::get("/users")).await?;
        Ok(decode_collection(&body, USERS_KEY))
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn projects(&self, query: &ProjectQuery) -> Result<Listing<Project>, ApiError> {
        self.get_listing(ApiRequest::get("/projects").query(query.to_pairs()), PROJECTS_KEY)
            .await
    }

    pub async fn project(&self, id: &str) -> Result<ProjectDetail, ApiError> {
        let body = self.execute(ApiRequest::get(format!("/projects/{id}"))).await?;
        Ok(ProjectDetail {
            project: entity(&body, "project")?,
            tasks: decode_collection(&body, TASKS_KEY),
        })
    }

    pub async fn create_project(&self, form: &ProjectForm) -> Result<Project, ApiError> {
        form.validate()?;
        let request = ApiRequest::post("/projects").json(serde_json::to_value(form)?);
        self.get_entity(request, "project").await
    }

    pub async fn update_project(&self, id: &str, form: &ProjectForm) -> Result<Project, ApiError> {
        form.validate()?;
        let request = ApiRequest::put(format!("/projects/{id}")).json(serde_json::to_value(form)?);
        self.get_entity(request, "project").await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/projects/{id}")))
            .await
            .map(|_| ())
    }

    /// Server-computed statistics for one project, passed through untyped.
    pub async fn project_stats(&self, id: &str) -> Result<Value, ApiError> {
        let body = self.execute(ApiRequest::get(format!("/projects/{id}/stats"))).await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub async fn tasks(&self, query: &TaskQuery) -> Result<Listing<Task>, ApiError> {
        self.get_listing(ApiRequest::get("/tasks").query(query.to_pairs()), TASKS_KEY)
            .await
    }

    pub async fn my_tasks(&self, query: &TaskQuery) -> Result<Listing<Task>, ApiError> {
        self.get_listing(ApiRequest::get("/tasks/my-tasks").query(query.to_pairs()), TASKS_KEY)
            .await
    }

    pub async fn task(&self, id: &str) -> Result<Task, ApiError> {
        self.get_entity(ApiRequest::get(format!("/tasks/{id}")), "task").await
    }

    pub async fn create_task(&self, form: &TaskForm) -> Result<Task, ApiError> {
        form.validate()?;
        let request = ApiRequest::post("/tasks").json(serde_json::to_value(form)?);
        self.get_entity(request, "task").await
    }

    pub async fn update_task(&self, id: &str, form: &TaskForm) -> Result<Task, ApiError> {
        form.validate()?;
        let request = ApiRequest::put(format!("/tasks/{id}")).json(serde_json::to_value(form)?);
        self.get_entity(request, "task").await
    }

    pub async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ApiError> {
        let patch = TaskPatch::status(status);
        let request = ApiRequest::put(format!("/tasks/{id}")).json(serde_json::to_value(&patch)?);
        self.get_entity(request, "task").await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/tasks/{id}")))
            .await
            .map(|_| ())
    }

    /// Post a comment. The server's echo of the comment is returned when it decodes.
    pub async fn add_comment(&self, task_id: &str, comment: &str) -> Result<Option<TaskComment>, ApiError> {
        let comment = validate_comment(comment)?;
        let request =
            ApiRequest::post(format!("/tasks/{task_id}/comments")).json(json!({ "comment": comment }));
        let body = self.execute(request).await?;
        Ok(decode_entity(&body, "comment"))
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    pub async fn dashboard_analytics(&self) -> Result<DashboardAnalytics, ApiError> {
        self.get_entity(ApiRequest::get("/analytics/dashboard"), "analytics")
            .await
    }

    pub async fn project_analytics(&self, range: &DateRange) -> Result<Value, ApiError> {
        let body = self
            .execute(ApiRequest::get("/analytics/projects").query(range.to_pairs()))
            .await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    pub async fn team_analytics(&self, range: &DateRange) -> Result<Value, ApiError> {
        let body = self
            .execute(ApiRequest::get("/analytics/team").query(range.to_pairs()))
            .await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

fn check(response: RawResponse) -> Result<Value, ApiError> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(ApiError::Status {
            status: response.status,
            message: error_message(&response.body),
        })
    }
}

fn entity<E: DeserializeOwned>(body: &Value, key: &str) -> Result<E, ApiError> {
    decode_entity(body, key).ok_or_else(|| ApiError::Decode(format!("response has no `{key}`")))
}

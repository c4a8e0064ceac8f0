//! REST client for the taskboard API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_core::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use taskboard_core::task::{CreateTask, Task, UpdateTask};

use crate::backend::ProjectsBackend;
use crate::error::ClientError;

/// Base URL used when `TASKBOARD_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// [`ProjectsBackend`] over HTTP using [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api_url: String,
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpBackend {
    /// * `api_url` - Base URL including the `/api` prefix, e.g.
    ///   `http://localhost:3000/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Read the base URL from `TASKBOARD_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`HttpBackend::from_env`] through an arbitrary variable lookup.
    /// A blank value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("TASKBOARD_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(url)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn projects_url(&self) -> String {
        format!("{}/projects", self.api_url)
    }

    fn project_url(&self, id: &str) -> String {
        format!("{}/projects/{}", self.api_url, id)
    }

    fn tasks_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}/tasks", self.api_url, project_id)
    }

    fn task_url(&self, project_id: &str, task_id: &str) -> String {
        format!("{}/projects/{}/tasks/{}", self.api_url, project_id, task_id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn send_json<B, T>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(request.json(body)).await
    }

    // ---- private helpers ----

    /// Decode a 2xx body, or turn anything else into [`ClientError::Api`].
    ///
    /// The error message is the server's `message` field, `"HTTP <status>"`
    /// when the envelope has none, or `"Unknown error"` when the body is
    /// not JSON at all.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody {
                message: Some(message),
            }) if !message.is_empty() => message,
            Ok(_) => format!("HTTP {}", status.as_u16()),
            Err(_) => "Unknown error".to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ProjectsBackend for HttpBackend {
    async fn list_projects(&self) -> Result<Vec<ProjectWithTasks>, ClientError> {
        self.send(self.client.get(self.projects_url())).await
    }

    async fn create_project(&self, input: &CreateProject) -> Result<ProjectWithTasks, ClientError> {
        self.send_json(self.client.post(self.projects_url()), input)
            .await
    }

    async fn update_project(
        &self,
        id: &str,
        input: &UpdateProject,
    ) -> Result<ProjectWithTasks, ClientError> {
        self.send_json(self.client.put(self.project_url(id)), input)
            .await
    }

    async fn delete_project(&self, id: &str) -> Result<Project, ClientError> {
        self.send(self.client.delete(self.project_url(id))).await
    }

    async fn create_task(&self, project_id: &str, input: &CreateTask) -> Result<Task, ClientError> {
        self.send_json(self.client.post(self.tasks_url(project_id)), input)
            .await
    }

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        input: &UpdateTask,
    ) -> Result<Task, ClientError> {
        self.send_json(self.client.put(self.task_url(project_id, task_id)), input)
            .await
    }

    async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<Task, ClientError> {
        self.send(self.client.delete(self.task_url(project_id, task_id)))
            .await
    }
}

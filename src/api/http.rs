// HTTP task store - talks to a json-server style REST resource

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::{debug, error};

use super::TaskStore;
use crate::error::{Result, TaskError};
use crate::models::{NewTask, Task, TaskFields, TaskPatch};

pub struct HttpTaskStore {
    client: Client,
    baseUrl: Url,
}

impl HttpTaskStore {
    /// `baseUrl` is the collection URL, e.g. `http://localhost:3000/tasks`
    pub fn new(baseUrl: &str) -> Result<Self> {
        let baseUrl = Url::parse(baseUrl).map_err(|e| TaskError::InvalidUrl(format!("{baseUrl}: {e}")))?;
        if baseUrl.cannot_be_a_base() {
            return Err(TaskError::InvalidUrl(baseUrl.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            baseUrl,
        })
    }

    pub fn baseUrl(&self) -> &Url {
        &self.baseUrl
    }

    fn listUrl(&self) -> Url {
        let mut url = self.baseUrl.clone();
        url.query_pairs_mut().append_pair("_sort", "-createdAt");
        url
    }

    fn taskUrl(&self, id: &str) -> Result<Url> {
        let mut url = self.baseUrl.clone();
        url.path_segments_mut()
            .map_err(|_| TaskError::InvalidUrl(self.baseUrl.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

/// Non-2xx responses become `TaskError::Status`
fn checkStatus(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        error!(status = status.as_u16(), url = %res.url(), "Task API request failed");
        Err(TaskError::Status { status: status.as_u16() })
    }
}

async fn readTask(res: Response) -> Result<Task> {
    checkStatus(res)?
        .json::<Task>()
        .await
        .map_err(|e| TaskError::Decode(e.to_string()))
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn listTasks(&self) -> Result<Vec<Task>> {
        let url = self.listUrl();
        debug!(%url, "GET tasks");
        let res = self.client.get(url).send().await?;
        checkStatus(res)?
            .json::<Vec<Task>>()
            .await
            .map_err(|e| TaskError::Decode(e.to_string()))
    }

    async fn createTask(&self, fields: &TaskFields) -> Result<Task> {
        let body = NewTask::new(fields.clone());
        debug!(url = %self.baseUrl, title = %body.fields.title, "POST task");
        let res = self
            .client
            .post(self.baseUrl.clone())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;
        readTask(res).await
    }

    async fn updateTask(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let url = self.taskUrl(id)?;
        debug!(%url, "PATCH task");
        let res = self
            .client
            .patch(url)
            .header("Content-Type", "application/json")
            .json(patch)
            .send()
            .await?;
        readTask(res).await
    }

    async fn deleteTask(&self, id: &str) -> Result<()> {
        let url = self.taskUrl(id)?;
        debug!(%url, "DELETE task");
        let res = self
            .client
            .delete(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        // DELETE answers without a body worth reading
        checkStatus(res).map(|_| ())
    }
}

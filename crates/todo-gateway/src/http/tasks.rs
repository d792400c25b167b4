use async_trait::async_trait;
use tracing::{debug, instrument};

use todo_model::{Task, TaskDraft, TaskId, TaskPage, TaskQuery};

use super::{HttpGateway, wire::ListResponse};
use crate::{errors::GatewayError, handler::TaskGateway};

#[async_trait]
impl TaskGateway for HttpGateway {
    #[instrument(level = "debug", skip(self, query), fields(page = query.page, limit = query.limit))]
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage<Task>, GatewayError> {
        let url = self.list_url(query)?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = self.check(response).await?;

        let body = self.body(response).await?;
        let list: ListResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("failed to parse task list: {e}, body: {body}"))
        })?;

        let page = TaskPage::from(list);
        debug!(count = page.items.len(), total = page.total, "tasks read");
        Ok(page)
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, GatewayError> {
        let url = self.endpoint("api/tasks/create")?;
        let response = self
            .client()
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = self.check(response).await?;

        let created = self.optional_task(response).await?;
        debug!(task_id = ?created.as_ref().and_then(|t| t.id.as_ref()), "task created");
        Ok(created)
    }

    #[instrument(level = "debug", skip_all, fields(%id))]
    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<Option<Task>, GatewayError> {
        let url = self.task_endpoint("api/tasks/update", id.as_str())?;
        let response = self
            .client()
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = self.check(response).await?;

        let updated = self.optional_task(response).await?;
        debug!(has_body = updated.is_some(), "task updated");
        Ok(updated)
    }

    #[instrument(level = "debug", skip_all, fields(%id))]
    async fn delete(&self, id: &TaskId) -> Result<(), GatewayError> {
        let url = self.task_endpoint("api/tasks/delete", id.as_str())?;
        let response = self
            .client()
            .delete(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.check(response).await?;

        debug!("task deleted");
        Ok(())
    }

    async fn health(&self) -> Result<(), GatewayError> {
        let url = self.endpoint("api/tasks/")?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.check(response).await?;
        Ok(())
    }
}

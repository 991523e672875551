//! boardflow-http: REST adapter for the board backend.
//!
//! Implements [`TaskBackend`] against the server's task endpoints. The
//! server's persistence format is its own business; this adapter only knows
//! the two write calls the engine makes and treats every non-2xx response as
//! a rejection (which the reconciler turns into a rollback).

use anyhow::{bail, Context, Result};
use boardflow_core::{Status, Task};
use boardflow_sync::TaskBackend;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the flat task collection for a list, in the server's canonical
    /// order. This is the repository read the engine rebuilds its GroupIndex
    /// from after invalidation.
    pub async fn fetch_board(&self, list_id: &str) -> Result<(Vec<Task>, Vec<Status>)> {
        #[derive(Deserialize)]
        struct BoardResp {
            tasks: Vec<Task>,
            statuses: Vec<Status>,
        }

        let resp = self
            .client
            .get(self.url(&format!("/lists/{list_id}/board")))
            .headers(self.headers()?)
            .send()
            .await
            .context("fetch board")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("fetch board failed: {status} {txt}");
        }

        let out: BoardResp = resp.json().await.context("parse board response")?;
        Ok((out.tasks, out.statuses))
    }
}

impl TaskBackend for HttpBackend {
    async fn update_task_status(&self, task_id: &str, new_status_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            status: &'a str,
        }

        log::debug!("PUT task {task_id} status -> {new_status_id}");

        let resp = self
            .client
            .put(self.url(&format!("/tasks/{task_id}")))
            .headers(self.headers()?)
            .json(&Req {
                status: new_status_id,
            })
            .send()
            .await
            .context("status update request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("status update rejected: {status} {txt}");
        }
        Ok(())
    }

    async fn persist_order(&self, group_id: &str, ordered_task_ids: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            task_ids: &'a [String],
        }

        log::debug!(
            "PUT group {group_id} order ({} tasks)",
            ordered_task_ids.len()
        );

        let resp = self
            .client
            .put(self.url(&format!("/groups/{group_id}/order")))
            .headers(self.headers()?)
            .json(&Req {
                task_ids: ordered_task_ids,
            })
            .send()
            .await
            .context("order persistence request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("order persistence rejected: {status} {txt}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let b = HttpBackend::new("https://api.example.com/", "tok");
        assert_eq!(b.url("/tasks/t1"), "https://api.example.com/tasks/t1");
    }

    #[test]
    fn url_joins_paths() {
        let b = HttpBackend::new("https://api.example.com", "tok");
        assert_eq!(
            b.url("/groups/open/order"),
            "https://api.example.com/groups/open/order"
        );
    }
}

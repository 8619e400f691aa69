//! Recording in-memory client for unit tests.

use async_trait::async_trait;
use github_client::{
    BranchProtection, BranchProtectionClient, Error, RemoteProtectionPayload, RepositorySummary,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted reply for a set-protection call.
#[derive(Debug, Clone)]
pub(crate) enum ScriptedResponse {
    NotFound,
    ApiError(u16, String),
    /// Never answers within a test's lifetime
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetCall {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub payload: RemoteProtectionPayload,
}

#[derive(Default)]
pub(crate) struct FakeClient {
    repositories: Vec<RepositorySummary>,
    failing_page: Option<u32>,
    responses: HashMap<(String, String), ScriptedResponse>,
    list_calls: Mutex<Vec<(u32, u8)>>,
    set_calls: Mutex<Vec<SetCall>>,
}

impl FakeClient {
    pub fn with_repositories(names: &[&str]) -> Self {
        Self::with_summaries(
            names
                .iter()
                .map(|name| RepositorySummary::new(*name, false))
                .collect(),
        )
    }

    pub fn with_summaries(repositories: Vec<RepositorySummary>) -> Self {
        Self {
            repositories,
            ..Default::default()
        }
    }

    pub fn fail_listing_on_page(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub fn respond(mut self, repository: &str, branch: &str, response: ScriptedResponse) -> Self {
        self.responses
            .insert((repository.to_string(), branch.to_string()), response);
        self
    }

    pub fn list_calls(&self) -> Vec<(u32, u8)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn set_calls(&self) -> Vec<SetCall> {
        self.set_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BranchProtectionClient for FakeClient {
    async fn list_organization_repositories(
        &self,
        _org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositorySummary>, Error> {
        self.list_calls.lock().unwrap().push((page, per_page));

        if self.failing_page == Some(page) {
            return Err(Error::ApiError {
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }

        let start = (page.saturating_sub(1) as usize) * usize::from(per_page);
        Ok(self
            .repositories
            .iter()
            .skip(start)
            .take(usize::from(per_page))
            .cloned()
            .collect())
    }

    async fn get_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> Result<BranchProtection, Error> {
        Ok(BranchProtection::default())
    }

    async fn set_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &RemoteProtectionPayload,
    ) -> Result<(), Error> {
        self.set_calls.lock().unwrap().push(SetCall {
            owner: owner.to_string(),
            repository: repo.to_string(),
            branch: branch.to_string(),
            payload: payload.clone(),
        });

        match self.responses.get(&(repo.to_string(), branch.to_string())) {
            None => Ok(()),
            Some(ScriptedResponse::NotFound) => Err(Error::NotFound),
            Some(ScriptedResponse::ApiError(status, message)) => Err(Error::ApiError {
                status: *status,
                message: message.clone(),
            }),
            Some(ScriptedResponse::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }
    }
}

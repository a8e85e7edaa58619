use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::GithubError;

/// A GitHub API client bound to one repository for the duration of a
/// single delivery. Built from a fresh installation token every time;
/// nothing is reused across deliveries.
pub struct RepoClient {
    client: Octocrab,
    owner: String,
    repo: String,
}

/// The fields the bot reads back from an issue lookup.
#[derive(Debug, Deserialize)]
pub struct IssueDetails {
    pub user: UserRef,
}

/// The fields the bot reads back from a pull request lookup.
#[derive(Debug, Deserialize)]
pub struct PullDetails {
    pub user: UserRef,
}

#[derive(Debug, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

/// States the bot writes to its commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Success,
}

/// Body of a `POST /repos/{owner}/{repo}/statuses/{sha}` call.
#[derive(Debug, Serialize)]
pub struct CommitStatus {
    pub state: StatusState,
    pub description: &'static str,
    pub context: &'static str,
}

impl RepoClient {
    pub fn new(token: &str, owner: &str, repo: &str, api_root: &str) -> Result<Self, GithubError> {
        let client = Octocrab::builder()
            .base_uri(api_root)
            .map_err(GithubError::Api)?
            .personal_token(token.to_string())
            .build()
            .map_err(GithubError::Api)?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub async fn issue(&self, number: u64) -> Result<IssueDetails, GithubError> {
        let route = format!("/repos/{}/{}/issues/{}", self.owner, self.repo, number);
        Ok(self.client.get(route, None::<&()>).await?)
    }

    pub async fn pull_request(&self, number: u64) -> Result<PullDetails, GithubError> {
        let route = format!("/repos/{}/{}/pulls/{}", self.owner, self.repo, number);
        Ok(self.client.get(route, None::<&()>).await?)
    }

    /// Comments on an issue. Pull requests are issues as far as comments
    /// are concerned, so this serves both.
    pub async fn comment(&self, number: u64, body: &str) -> Result<(), GithubError> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            self.owner, self.repo, number
        );
        let _: serde_json::Value = self.client.post(route, Some(&json!({ "body": body }))).await?;
        Ok(())
    }

    /// Adds `label` to an issue. The API accepts re-adding an existing
    /// label, so redelivered events don't grow the label set.
    pub async fn add_label(&self, number: u64, label: &str) -> Result<(), GithubError> {
        let route = format!(
            "/repos/{}/{}/issues/{}/labels",
            self.owner, self.repo, number
        );
        let _: serde_json::Value = self
            .client
            .post(route, Some(&json!({ "labels": [label] })))
            .await?;
        Ok(())
    }

    /// Sha of the most recent commit of a pull request.
    pub async fn latest_commit(&self, number: u64) -> Result<String, GithubError> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/commits?per_page=100",
            self.owner, self.repo, number
        );
        let commits: Vec<CommitRef> = self.client.get(route, None::<&()>).await?;
        commits
            .last()
            .map(|commit| commit.sha.clone())
            .ok_or(GithubError::EmptyPullRequest(number))
    }

    /// Creates a commit status. The statuses API is append-only: a new
    /// entry supersedes earlier ones for the same context, nothing is
    /// mutated in place.
    pub async fn create_commit_status(
        &self,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<(), GithubError> {
        let route = format!("/repos/{}/{}/statuses/{}", self.owner, self.repo, sha);
        let _: serde_json::Value = self.client.post(route, Some(status)).await?;
        Ok(())
    }

    /// Deletes a git ref such as `heads/some-branch`.
    pub async fn delete_ref(&self, reference: &str) -> Result<(), GithubError> {
        let route = format!(
            "/repos/{}/{}/git/refs/{}",
            self.owner, self.repo, reference
        );
        let response = self.client._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }
}

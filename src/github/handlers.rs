use tracing::warn;

use crate::webhooks::github::events::{GitHubEvent, PullRequest};

use super::client::{CommitStatus, RepoClient, StatusState};
use super::error::GithubError;

/// Title markers that flag a pull request as not ready to merge.
const WIP_MARKERS: [&str; 3] = ["WIP", "work in progress", "do not merge"];

/// Routes a classified event to its handler. Exactly one handler runs per
/// delivery; unsupported events are a no-op.
pub async fn dispatch(repo: &RepoClient, event: GitHubEvent) -> Result<(), GithubError> {
    match event {
        GitHubEvent::IssueOpened { issue } => issue_opened(repo, issue.number).await,
        GitHubEvent::PullRequestOpened { pull_request } => {
            refresh_wip_status(repo, pull_request.number, &pull_request.title, None).await
        }
        GitHubEvent::PullRequestEdited {
            pull_request,
            previous_title,
        } => {
            refresh_wip_status(
                repo,
                pull_request.number,
                &pull_request.title,
                previous_title.as_deref(),
            )
            .await
        }
        GitHubEvent::PullRequestMerged { pull_request } => {
            pull_request_merged(repo, &pull_request).await
        }
        GitHubEvent::Unsupported => Ok(()),
    }
}

/// Welcomes the author of a freshly opened issue and tags it for triage.
async fn issue_opened(repo: &RepoClient, number: u64) -> Result<(), GithubError> {
    let issue = repo.issue(number).await?;
    let author = issue.user.login;

    let response = format!(
        "Thanks for opening this issue, @{}! \
         The repository maintainers will look into it ASAP! :speech_balloon:",
        author
    );
    repo.comment(number, &response).await?;
    repo.add_label(number, "Bug").await?;
    Ok(())
}

/// Thanks the author of a merged pull request and cleans up its branch.
async fn pull_request_merged(
    repo: &RepoClient,
    pull_request: &PullRequest,
) -> Result<(), GithubError> {
    let pull = repo.pull_request(pull_request.number).await?;
    let author = pull.user.login;

    let response = format!("Thanks @{}, the pull request has been merged!", author);
    repo.comment(pull_request.number, &response).await?;

    // The branch may already be gone, either through GitHub's own
    // auto-deletion or because the event was redelivered.
    let branch = format!("heads/{}", pull_request.head.r#ref);
    if let Err(err) = repo.delete_ref(&branch).await {
        warn!("couldn't delete {}: {}", branch, err);
    }
    Ok(())
}

/// Commit-status transition for the WIP check, computed from the current
/// title and, on edits, the previous one. `None` leaves the check alone.
fn wip_transition(title: &str, previous_title: Option<&str>) -> Option<CommitStatus> {
    let is_wip = WIP_MARKERS.iter().any(|marker| title.contains(marker));
    // The previous title matches markers case-insensitively: removing a
    // "wip:" prefix must flip the check to green just like removing "WIP:".
    let was_wip = previous_title.is_some_and(|previous| {
        let previous = previous.to_lowercase();
        WIP_MARKERS
            .iter()
            .any(|marker| previous.contains(&marker.to_lowercase()))
    });

    if is_wip {
        Some(CommitStatus {
            state: StatusState::Pending,
            description: "Work in progress",
            context: "WIP",
        })
    } else if was_wip {
        Some(CommitStatus {
            state: StatusState::Success,
            description: "Ready for review",
            context: "WIP",
        })
    } else {
        None
    }
}

/// Creates the WIP commit status on the most recent commit of a pull
/// request whose title moved into or out of the work-in-progress state.
async fn refresh_wip_status(
    repo: &RepoClient,
    number: u64,
    title: &str,
    previous_title: Option<&str>,
) -> Result<(), GithubError> {
    let Some(status) = wip_transition(title, previous_title) else {
        return Ok(());
    };

    let sha = repo.latest_commit(number).await?;
    repo.create_commit_status(&sha, &status).await
}

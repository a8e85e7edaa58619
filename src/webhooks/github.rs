use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod events;
use events::GitHubPayload;

use crate::github::{dispatch, AppAuthenticator, GithubError, RepoClient};

/// Receives webhook deliveries from GitHub.
///
/// GitHub only cares that the endpoint answers quickly with a 2xx, so the
/// delivery is processed inline and the answer is always an empty 204,
/// whether or not processing succeeded. Failures are logged for operators;
/// redelivery from GitHub is the only retry mechanism.
#[rocket::post("/", format = "json", data = "<payload>")]
pub async fn github_webhook(
    payload: Json<Value>,
    authenticator: &State<AppAuthenticator>,
) -> Status {
    if let Err(err) = process_delivery(authenticator, payload.into_inner()).await {
        warn!("ignoring malformed delivery: {}", err);
    }
    Status::NoContent
}

/// Decodes and classifies one delivery, then reacts to it.
async fn process_delivery(
    authenticator: &AppAuthenticator,
    payload: Value,
) -> Result<(), GithubError> {
    let payload: GitHubPayload = serde_json::from_value(payload)?;

    let Some((owner, repo)) = payload.repository_slug() else {
        debug!("payload carries no repository, nothing to do");
        return Ok(());
    };

    let action = payload.action.clone().unwrap_or_default();
    info!("received {:?} event for {}/{}", action, owner, repo);

    if let Err(err) = react(authenticator, &owner, &repo, payload).await {
        warn!(
            "couldn't handle {:?} event for {}/{}: {}",
            action, owner, repo, err
        );
    }
    Ok(())
}

/// One installation token, one repository-scoped client, one handler.
async fn react(
    authenticator: &AppAuthenticator,
    owner: &str,
    repo: &str,
    payload: GitHubPayload,
) -> Result<(), GithubError> {
    let token = authenticator.mint_installation_token(owner, repo).await?;
    let client = RepoClient::new(&token, owner, repo, authenticator.api_root())?;
    dispatch(&client, payload.into_event()).await
}

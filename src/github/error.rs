use thiserror::Error;

/// Failures of the GitHub App authentication flow. None of these are
/// recoverable within a delivery; they bubble up to the endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The configured credential is not a usable RSA key.
    #[error("invalid GitHub App private key: {0}")]
    InvalidPrivateKey(#[from] jsonwebtoken::errors::Error),

    /// Installation lookup or token exchange failed.
    #[error("installation token exchange failed: {0}")]
    TokenExchange(#[from] octocrab::Error),
}

/// Everything that can go wrong while reacting to one delivery.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub App authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("GitHub API request failed: {0}")]
    Api(#[from] octocrab::Error),

    /// The body was valid JSON but doesn't have the shape of a webhook
    /// delivery.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("pull request #{0} has no commits")]
    EmptyPullRequest(u64),
}

use jsonwebtoken::EncodingKey;
use octocrab::models::{AppId, InstallationToken};
use octocrab::Octocrab;

use super::error::AuthError;

/// Authenticates as a GitHub App and mints installation-scoped tokens.
///
/// The private key is read once at startup and kept, unparsed, for the
/// lifetime of the process. Tokens are minted per delivery and never
/// cached: they are short-lived anyway and a webhook receiver sees far
/// fewer deliveries than the token lifetime would amortize.
pub struct AppAuthenticator {
    app_id: u64,
    private_key: String,
    api_root: String,
}

impl AppAuthenticator {
    pub fn new(app_id: u64, private_key: String, api_root: String) -> Self {
        Self {
            app_id,
            private_key,
            api_root,
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Exchanges the App credential for a short-lived access token scoped
    /// to the installation that owns `owner/repo`.
    ///
    /// Fails when the key is unusable, the App isn't installed on the
    /// repository, or GitHub refuses the exchange.
    pub async fn mint_installation_token(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<String, AuthError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        let app = Octocrab::builder()
            .base_uri(self.api_root.as_str())
            .map_err(AuthError::TokenExchange)?
            .app(AppId(self.app_id), key)
            .build()
            .map_err(AuthError::TokenExchange)?;

        let installation = app.apps().get_repository_installation(owner, repo).await?;
        let token: InstallationToken = app
            .post(
                format!("/app/installations/{}/access_tokens", installation.id),
                None::<&()>,
            )
            .await?;
        Ok(token.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_key_is_rejected() {
        let authenticator = AppAuthenticator::new(
            311883,
            "not a pem at all".to_string(),
            "https://api.github.com".to_string(),
        );

        let err = authenticator
            .mint_installation_token("acme", "widgets")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidPrivateKey(_)));
    }
}

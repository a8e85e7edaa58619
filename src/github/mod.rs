//! Acting side of the bot: GitHub App authentication, the per-delivery
//! repository client, and the event handlers.

mod auth;
mod client;
mod error;
mod handlers;

pub use auth::AppAuthenticator;
pub use client::RepoClient;
pub use error::{AuthError, GithubError};
pub use handlers::dispatch;

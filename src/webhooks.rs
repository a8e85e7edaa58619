//! Inbound side of the bot: the HTTP endpoint GitHub delivers webhooks to.

pub mod github;

pub use github::github_webhook;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rocket::routes;

mod config;
use config::HublotConfig;

mod github;
use github::AppAuthenticator;

mod webhooks;
use webhooks::github_webhook;

#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Configuration file for hublot
    #[arg(short, long)]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: HublotConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let key_file = shellexpand::tilde(&config.github_key_file).into_owned();
    let private_key = fs::read_to_string(&key_file)
        .with_context(|| format!("couldn't read GitHub App key {}", key_file))?;

    let authenticator =
        AppAuthenticator::new(config.github_app_id, private_key, config.github_api_root);

    let figment = rocket::Config::figment().merge(("port", config.port));
    let rocket = rocket::custom(figment)
        .mount("/", routes![github_webhook])
        .manage(authenticator);
    let _rocket = rocket.launch().await.map_err(|err| anyhow::anyhow!(err))?;

    Ok(())
}

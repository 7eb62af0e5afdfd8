#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for sending emails and campaigns

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::{anyhow, Result};
use campaign_mailer::{
    domain::communication::dispatch::DispatchServiceImpl,
    infrastructure::{
        email::{ConfiguredMailer, MailerConfig},
        http::{
            servers::{http::HttpServer, https::HttpsServer},
            state::{AppConfig, AppState},
            HttpServerConfig, Server,
        },
    },
};
use clap::Parser;
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The delivery backend configuration
    #[clap(flatten)]
    pub mailer: MailerConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install the rustls crypto provider"))?;

    let args = Args::parse();

    let mailer = ConfiguredMailer::from_config(&args.mailer)?;

    info!(backend = mailer.name(), "mailer ready");

    let state = AppState::new(
        AppConfig::default(),
        DispatchServiceImpl::new(Arc::new(mailer)),
    );

    let address = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), args.server.http_port);

    match args.server.tls_paths() {
        Some((cert_path, key_path)) => {
            HttpsServer::new(address, cert_path, key_path, state)
                .await?
                .run()
                .await
        }
        None => HttpServer::new(address, state)?.run().await,
    }
}

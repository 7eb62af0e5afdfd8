use std::sync::Arc;

use anyhow::Result;
use campaign_mailer::{
    domain::communication::{
        dispatch::{DispatchService, DispatchServiceImpl},
        email_addresses::EmailAddress,
        mailer::Message,
    },
    infrastructure::email::{ConfiguredMailer, MailerConfig},
};
use clap::Parser;

#[derive(Parser)]
pub struct Args {
    #[clap(flatten)]
    pub mailer: MailerConfig,

    /// The sender address
    #[clap(long, default_value = "news@example.com")]
    pub from: String,

    /// The campaign id used to tag every email
    #[clap(long, default_value = "demo")]
    pub campaign_id: String,

    /// Recipients of the demo campaign
    #[clap(required = true)]
    pub recipients: Vec<String>,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mailer = ConfiguredMailer::from_config(&args.mailer)?;
    let from = EmailAddress::new(&args.from)?;

    let messages = args
        .recipients
        .iter()
        .map(|recipient| {
            let to = EmailAddress::new(recipient)?;
            let greeting = format!("<p>Hello {}!</p>", to.display_name());

            Ok(Message::new(to, from.clone(), "Hello from the demo campaign", greeting)
                .with_from_name("Campaign Mailer")
                .with_campaign_id(&args.campaign_id))
        })
        .collect::<Result<Vec<_>>>()?;

    let service = DispatchServiceImpl::new(Arc::new(mailer));
    let outcome = service
        .send_bulk_email(&args.campaign_id, &messages)
        .await;

    println!("sent: {}, failed: {}", outcome.sent, outcome.failed);

    for error in outcome.errors().unwrap_or_default() {
        println!("  {}", error);
    }

    Ok(())
}

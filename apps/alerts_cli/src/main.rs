use std::sync::Arc;

use advice::{AdviceService, GeminiClient, GeminiConfig, TextGenerator, UnavailableGenerator};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::{domain::BenefitCategory, paydays::next_pay_dates};
use signup_api::{ApiContext, SignupRequest};
use storage::{SqliteSlots, SubscriberStore, SystemClock};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_database_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "payday-alerts", about = "Grant payday alerts: pay dates, signups and tips")]
struct Cli {
    /// Overrides the configured subscriber database.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimated pay dates for the next pay run.
    Dates {
        /// Date to estimate from (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Subscribe a phone number to payday alerts.
    Subscribe {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, value_parser = parse_category)]
        category: BenefitCategory,
    },
    /// Subscriber count as displayed to visitors.
    Count,
    /// Stored subscriber records as JSON.
    List,
    /// A short financial tip for a grant category.
    Tip {
        #[arg(long, value_parser = parse_category)]
        category: BenefitCategory,
    },
    /// Advice topics available to `ask`.
    Topics,
    /// Advice for one of the listed topics.
    Ask {
        /// Topic label, as printed by `topics`.
        topic: String,
    },
}

fn parse_category(raw: &str) -> Result<BenefitCategory, String> {
    raw.parse().map_err(|err: shared::error::ValidationError| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }

    let ctx = build_context(&settings).await?;

    match cli.command {
        Command::Dates { today } => {
            let estimates = match today {
                Some(today) => next_pay_dates(today),
                None => signup_api::pay_dates(&ctx),
            };
            for estimate in estimates {
                println!("{:<34} {} (estimated)", estimate.category.label(), estimate.date);
            }
        }
        Command::Subscribe {
            name,
            phone,
            category,
        } => {
            let request = SignupRequest {
                name,
                phone,
                category,
            };
            match signup_api::subscribe(&ctx, request).await {
                Ok(confirmation) => {
                    println!(
                        "Subscribed {} ({}). You will receive SMS notifications at {}.",
                        confirmation.subscriber.name,
                        confirmation.subscriber.category,
                        confirmation.subscriber.phone
                    );
                    println!(
                        "[{} {}] {}",
                        confirmation.sms.timestamp, confirmation.sms.sender, confirmation.sms.message
                    );
                    println!("Tip: {}", confirmation.tip);
                    println!(
                        "Join the community of {} subscribers.",
                        confirmation.subscriber_count
                    );
                }
                Err(err) => {
                    error!(code = ?err.code, message = %err.message, "signup rejected");
                    return Err(anyhow!(err.message));
                }
            }
        }
        Command::Count => {
            println!("{}", signup_api::subscriber_count(&ctx).await);
        }
        Command::List => {
            let subscribers = ctx.store.list_subscribers().await;
            println!("{}", serde_json::to_string_pretty(&subscribers)?);
        }
        Command::Tip { category } => {
            println!("{}", ctx.advice.financial_tip(category).await);
        }
        Command::Topics => {
            for topic in signup_api::advice_topics() {
                println!("{:<24} {}", topic.label, topic.category);
            }
        }
        Command::Ask { topic } => {
            let topic = signup_api::find_topic(&topic).map_err(|err| anyhow!(err.message))?;
            println!("{}", signup_api::ask_advice(&ctx, topic).await);
        }
    }

    Ok(())
}

async fn build_context(settings: &Settings) -> Result<ApiContext> {
    let database_url = prepare_database_url(&settings.database_url);
    let slots = SqliteSlots::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let generator: Arc<dyn TextGenerator> = match &settings.gemini_api_key {
        Some(api_key) => Arc::new(GeminiClient::new(GeminiConfig {
            api_key: api_key.clone(),
            model: settings.gemini_model.clone(),
            base_url: settings.gemini_base_url.clone(),
        })?),
        None => {
            info!("no Gemini API key configured; using fallback copy");
            Arc::new(UnavailableGenerator)
        }
    };

    let clock = Arc::new(SystemClock);
    Ok(ApiContext {
        store: SubscriberStore::new(Arc::new(slots), clock.clone()),
        advice: AdviceService::new(generator).with_timeout(settings.advice_timeout),
        clock,
    })
}

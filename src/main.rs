//! Wiring & DI. Entry point: bootstrap the Telegram client, load the JSON
//! stores, inject them into the services, and run the update loop plus the
//! daily trigger through one serialized event queue. No business logic here.

use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tg_reminder::adapters::persistence::{DedupJson, RemindersJson, ReportsJson};
use tg_reminder::adapters::telegram::{session, GrammersTgGateway, TelegramUpdateLoop};
use tg_reminder::ports::{DedupTracker, InputPort, ReminderRepo, ReportLedger, TgGateway};
use tg_reminder::shared::config::{today_in_zone, AppConfig};
use tg_reminder::usecases::{CommandService, DailyTrigger, EventWorker, SweepService};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Bounded queue between the update loop / daily trigger and the event
/// worker. Commands are rare; a small buffer is plenty.
const EVENT_QUEUE_SIZE: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (using process env)"),
    }

    let cfg = AppConfig::load().unwrap_or_default();
    let bot_token = cfg.bot_token.clone().unwrap_or_default();
    if bot_token.is_empty() {
        anyhow::bail!("Set TG_REMINDER_BOT_TOKEN (or BOT_TOKEN) in env or .env. Get one from @BotFather");
    }
    let api_hash = cfg
        .api_hash
        .clone()
        .or_else(|| std::env::var("TG_REMINDER_API_HASH").ok())
        .unwrap_or_default();
    if api_hash.is_empty() {
        anyhow::bail!("Set TG_REMINDER_API_HASH (env or .env). Get from https://my.telegram.org");
    }

    let data_dir = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_dir.display(), "data directory");
    let session_path = PathBuf::from(cfg.session_path_or_default());

    // --- Telegram client + bot authorization (token sign-in once per session file) ---
    let client = create_telegram_client(&cfg, &session_path).await?;
    if !client
        .is_authorized()
        .await
        .map_err(|e| anyhow::anyhow!("authorization check: {}", e))?
    {
        client
            .bot_sign_in(&bot_token, &api_hash)
            .await
            .map_err(|e| anyhow::anyhow!("bot sign-in: {}", e))?;
        info!("bot signed in");
    }
    let me = client
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("get_me: {}", e))?;
    let bot_username = me
        .username()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("bot account has no username"))?;
    info!(username = %bot_username, "bot online");

    // --- Stores: load-on-start, write-through JSON ---
    let reminders_impl = RemindersJson::new(data_dir.join("reminders.json"));
    reminders_impl.load().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    let reminders: Arc<dyn ReminderRepo> = Arc::new(reminders_impl);

    let reports_impl = ReportsJson::new(data_dir.join("reports.json"));
    reports_impl.load().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    let reports: Arc<dyn ReportLedger> = Arc::new(reports_impl);

    let dedup_impl = DedupJson::new(data_dir.join("notified.json"));
    dedup_impl
        .load(today_in_zone())
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let dedup: Arc<dyn DedupTracker> = Arc::new(dedup_impl);

    // --- Gateway (shared with the update loop, which feeds its peer cache) ---
    let gateway = Arc::new(GrammersTgGateway::new(client.clone()));
    let tg: Arc<dyn TgGateway> = Arc::clone(&gateway) as Arc<dyn TgGateway>;

    // --- Services on one serialized event queue (commands never race the sweep) ---
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_SIZE);

    let commands = CommandService::new(
        Arc::clone(&reminders),
        Arc::clone(&reports),
        Arc::clone(&dedup),
    );
    let sweep = SweepService::new(reminders, reports, dedup, Arc::clone(&tg));
    let worker = EventWorker::new(event_rx, commands, sweep, tg);
    tokio::spawn(async move {
        worker.run().await;
    });

    let trigger = DailyTrigger::new(event_tx.clone());
    tokio::spawn(async move {
        trigger.run_loop().await;
    });

    let input_port: Arc<dyn InputPort> = Arc::new(TelegramUpdateLoop::new(
        client,
        gateway,
        bot_username,
        event_tx,
    ));

    // --- Run until the update stream ends or a termination signal arrives ---
    tokio::select! {
        res = input_port.run() => res.map_err(|e| anyhow::anyhow!("{}", e))?,
        _ = tokio::signal::ctrl_c() => info!("termination signal; shutting down"),
    }

    Ok(())
}

/// Create grammers Client with persistent session storage.
/// Loads an existing session from `session_path` if present; otherwise a new
/// session is created and saved after the bot-token sign-in. Requires
/// TG_REMINDER_API_ID (and TG_REMINDER_API_HASH for the sign-in).
async fn create_telegram_client(
    cfg: &AppConfig,
    session_path: &Path,
) -> anyhow::Result<grammers_client::Client> {
    let api_id = cfg
        .api_id
        .or_else(|| {
            std::env::var("TG_REMINDER_API_ID")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(0);

    if api_id == 0 {
        anyhow::bail!(
            "Set TG_REMINDER_API_ID (and TG_REMINDER_API_HASH) in .env. Get from https://my.telegram.org"
        );
    }

    let session = session::open_session(session_path)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let session = Arc::new(session);
    let pool = grammers_client::SenderPool::new(session, api_id);
    let handle = pool.handle.clone();
    tokio::spawn(async move {
        pool.runner.run().await;
    });
    let client = grammers_client::Client::new(handle);

    Ok(client)
}

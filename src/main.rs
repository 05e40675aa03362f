use log::{error, info, warn};
use teleinfo::{ConfigHolder, TeleinfoInput, TeleinfoManager, Transmission};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let default_filter = std::env::var("TELEINFO_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = ConfigHolder::load().get_teleinfo_copy();

    // reader -> manager -> printer
    let (input_tx, input_rx) = tokio::sync::mpsc::channel::<TeleinfoInput>(config.channel_size);
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Transmission>(config.channel_size);

    let mut threads: Vec<JoinHandle<()>> = Vec::new();

    let mut manager = TeleinfoManager::new(tx, config);
    threads.push(tokio::spawn(async move {
        manager.start_thread(input_rx).await;
    }));

    threads.push(tokio::spawn(async move {
        while let Some(t) = rx.recv().await {
            match t {
                Transmission::Metering(mr) => match serde_json::to_string(&mr) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("Unable to serialize metering data: {e}"),
                },
                Transmission::Discarded { meter_name, reason } => {
                    warn!("Frame of {meter_name} dropped: {reason}");
                }
            }
        }
    }));

    /* Feed stdin line by line, the reader owns the only input sender */
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(input) = TeleinfoInput::from_line(&line) {
            if input_tx.send(input).await.is_err() {
                error!("Teleinfo manager stopped, no longer reading input");
                break;
            }
        }
    }
    /* Flush a last frame without trailing blank line */
    let _ = input_tx.send(TeleinfoInput::EndOfFrame).await;
    drop(input_tx);

    for task in threads {
        if let Err(e) = task.await {
            error!("Task failed: {e}");
        }
    }

    info!("Input finished, exiting");
    Ok(())
}

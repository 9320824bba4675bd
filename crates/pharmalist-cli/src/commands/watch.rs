//! Watch command: re-fetch lists until interrupted.

use super::Session;
use crate::cli::WatchArgs;
use crate::error::Result;
use crate::output::Formatter;
use pharmalist_sdk::ListPoller;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Execute the watch command.
pub async fn execute_watch(args: WatchArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let interval = args
        .interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(session.poll_interval);
    let domain = args.domain.or(session.domain);

    println!(
        "{}",
        formatter.info(&format!(
            "Refreshing every {}s, press Ctrl-C to stop",
            interval.as_secs()
        ))
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = ListPoller::new(session.service.clone())
        .in_domain(domain)
        .every(interval)
        .start(move |result| {
            let _ = tx.send(result);
        });

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = rx.recv() => match received {
                Some(Ok(lists)) => println!("{}", formatter.format_lists(&lists)?),
                Some(Err(e)) => eprintln!("{}", formatter.error(&e.to_string())),
                None => break,
            },
        }
    }

    debug!("stopping list poller");
    handle.stop().await;
    Ok(())
}

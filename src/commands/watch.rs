use anyhow::Result;
use caldesk_core::reminder::scan_interval;
use chrono::Local;
use owo_colors::OwoColorize;

use super::Context;

/// Scan for due reminders every `scan_interval_secs` until Ctrl-C.
///
/// Other caldesk invocations may change the session or the events while this
/// runs, so both are reloaded from disk before each scan.
pub async fn run(ctx: &mut Context) -> Result<()> {
    let mut interval = scan_interval(ctx.config.scan_interval());

    println!(
        "  Watching for reminders every {}s (Ctrl-C to stop)",
        ctx.config.scan_interval_secs
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                ctx.reload()?;

                if ctx.session.user().is_none() {
                    tracing::debug!("no user signed in, skipping scan");
                    continue;
                }

                let fired = ctx.session.tick(Local::now().naive_local())?;
                if fired > 0 {
                    println!("  {} reminder(s) sent", fired);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "  Stopped".dimmed());
                return Ok(());
            }
        }
    }
}

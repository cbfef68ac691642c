use anyhow::Result;
use caldesk_core::Recurrence;
use owo_colors::OwoColorize;

use super::{Context, parse_date};

pub fn run(
    ctx: &mut Context,
    date: &str,
    time: &str,
    title: &str,
    recurrence: Option<&str>,
) -> Result<()> {
    ctx.require_user()?;
    let key = parse_date(date)?;
    let recurrence = recurrence.map(str::parse::<Recurrence>).transpose()?;

    ctx.session.open_day(key);
    if let Some(draft) = ctx.session.draft_mut() {
        draft.title = title.to_string();
        draft.time = time.to_string();
        draft.recurrence = recurrence;
    }
    ctx.session.save()?;

    let count = ctx.session.store().events_on(&key).len();
    println!(
        "{}",
        format!("  Added to {}: {} - {} ({} that day)", key, time, title, count).green()
    );
    Ok(())
}

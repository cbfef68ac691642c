use anyhow::Result;
use owo_colors::OwoColorize;

use super::{Context, parse_date};

pub fn run(ctx: &mut Context, date: &str) -> Result<()> {
    ctx.require_user()?;
    let key = parse_date(date)?;

    let removed = ctx.session.store().events_on(&key).len();
    ctx.session.open_day(key);
    ctx.session.delete()?;

    if removed == 0 {
        println!("{}", format!("  No events on {}", key).dimmed());
    } else {
        println!("{}", format!("  Removed {} event(s) from {}", removed, key).red());
    }
    Ok(())
}

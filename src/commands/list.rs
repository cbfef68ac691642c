use anyhow::Result;
use owo_colors::OwoColorize;

use super::{Context, parse_date};
use crate::render;

pub fn run(ctx: &mut Context, date: &str) -> Result<()> {
    ctx.require_user()?;
    let key = parse_date(date)?;
    let events = ctx.session.store().events_on(&key);

    println!("{}", key.bold());
    if events.is_empty() {
        println!("{}", "  No events".dimmed());
    }
    for event in events {
        println!("  {}", render::event_line(event));
    }
    Ok(())
}

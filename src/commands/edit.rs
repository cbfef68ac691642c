use anyhow::Result;
use caldesk_core::{CalDeskError, Recurrence};
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use super::{Context, parse_date};
use crate::render;

const ACTIONS: [&str; 3] = ["Save", "Delete day", "Cancel"];

pub fn run(ctx: &mut Context, date: &str) -> Result<()> {
    ctx.require_user()?;
    let key = parse_date(date)?;

    let events = ctx.session.store().events_on(&key);
    println!("{}", key.bold());
    for event in events {
        println!("  {}", render::event_line(event));
    }
    println!();

    let mut draft = ctx.session.open_day(key);

    loop {
        draft.title = Input::new()
            .with_prompt("  Title")
            .with_initial_text(draft.title.clone())
            .allow_empty(true)
            .interact_text()?;

        draft.time = Input::new()
            .with_prompt("  Time (HH:MM)")
            .with_initial_text(draft.time.clone())
            .allow_empty(true)
            .interact_text()?;

        let labels: Vec<&str> = Recurrence::ALL.iter().map(Recurrence::as_str).collect();
        let current = Recurrence::ALL
            .iter()
            .position(|r| Some(*r) == draft.recurrence)
            .unwrap_or(0);
        let picked = Select::new()
            .with_prompt("  Repeats")
            .items(&labels)
            .default(current)
            .interact()?;
        draft.recurrence = Some(Recurrence::ALL[picked]);

        let action = Select::new()
            .with_prompt("  Action")
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        match action {
            0 => {
                if let Some(open) = ctx.session.draft_mut() {
                    *open = draft.clone();
                }
                match ctx.session.save() {
                    Ok(_) => {
                        println!("{}", format!("  Saved: {} - {}", draft.time, draft.title).green());
                        return Ok(());
                    }
                    Err(CalDeskError::Validation(msg)) => {
                        // editor stays open; ask again
                        eprintln!("  {}", msg.red());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            1 => {
                ctx.session.delete()?;
                println!("{}", format!("  Cleared {}", key).red());
                return Ok(());
            }
            _ => {
                ctx.session.cancel();
                println!("{}", "  Cancelled".dimmed());
                return Ok(());
            }
        }
    }
}

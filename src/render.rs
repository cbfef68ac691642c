//! Text rendering of month grids.

use caldesk_core::DateKey;
use caldesk_core::EventRecord;
use caldesk_core::grid::{DayCell, MonthGrid, WEEKDAY_NAMES};
use chrono::Local;
use owo_colors::OwoColorize;

const CELL_WIDTH: usize = 5;

/// `09:00 - Standup`, with the recurrence tag when there is one.
pub fn event_line(event: &EventRecord) -> String {
    match event.recurrence {
        Some(r) if r != caldesk_core::Recurrence::None => {
            format!("{} {}", event.summary(), format!("({})", r).dimmed())
        }
        _ => event.summary(),
    }
}

pub fn month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let today = DateKey::new(Local::now().date_naive());
    let width = CELL_WIDTH * 7;

    out.push_str(&format!("{:^width$}\n", grid.cursor.title(), width = width));
    for name in WEEKDAY_NAMES {
        out.push_str(&format!("{:>w$}", name, w = CELL_WIDTH));
    }
    out.push('\n');

    for week in grid.weeks() {
        for cell in week {
            out.push_str(&day_cell(cell, &today));
        }
        out.push('\n');
    }

    let with_events: Vec<_> = grid
        .cells
        .iter()
        .filter(|c| !c.events().is_empty())
        .collect();
    if !with_events.is_empty() {
        out.push('\n');
    }
    for cell in with_events {
        if let Some(key) = cell.key() {
            for event in cell.events() {
                out.push_str(&format!("  {}  {}\n", key.dimmed(), event_line(event)));
            }
        }
    }

    out
}

fn day_cell(cell: &DayCell, today: &DateKey) -> String {
    match cell {
        DayCell::Empty => " ".repeat(CELL_WIDTH),
        DayCell::Day { key, day, events } => {
            let marker = if events.is_empty() { ' ' } else { '*' };
            let text = format!("{:>w$}{}", day, marker, w = CELL_WIDTH - 1);
            if key == today {
                text.reversed().to_string()
            } else if !events.is_empty() {
                text.cyan().bold().to_string()
            } else {
                text
            }
        }
    }
}

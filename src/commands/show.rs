use anyhow::Result;
use caldesk_core::CalendarCursor;

use super::Context;
use crate::render;

pub fn run(ctx: &mut Context, year: Option<i32>, month: Option<u32>, offset: i32) -> Result<()> {
    ctx.require_user()?;

    let today = ctx.session.cursor();
    let year = year.unwrap_or(today.year());
    let month0 = month.map(|m| m as i32 - 1).unwrap_or(today.month() as i32);
    ctx.session.show(CalendarCursor::new(year, month0).offset(offset));

    print!("{}", render::month(&ctx.session.render()));
    Ok(())
}

use anyhow::Result;
use caldesk_core::identity::Identity;
use owo_colors::OwoColorize;

use super::Context;

fn prompt_password() -> Result<String> {
    Ok(rpassword::prompt_password("  Password: ")?)
}

pub fn signup(ctx: &mut Context, email: &str) -> Result<()> {
    let password = prompt_password()?;
    let confirm = rpassword::prompt_password("  Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    let user = ctx.identity.sign_up(email, &password)?;
    ctx.sync_user()?;

    println!("{}", format!("  Account created for {}", user.email).green());
    Ok(())
}

pub fn login(ctx: &mut Context, email: &str) -> Result<()> {
    let password = prompt_password()?;
    let user = ctx.identity.sign_in(email, &password)?;
    ctx.sync_user()?;

    println!(
        "{} ({} events)",
        format!("  Signed in as {}", user.email).green(),
        ctx.session.store().len()
    );
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    if ctx.identity.current_user().is_none() {
        println!("{}", "  Not signed in".dimmed());
        return Ok(());
    }

    ctx.identity.sign_out()?;
    ctx.sync_user()?;
    println!("  Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.user() {
        Some(user) => println!("{}", user.email),
        None => println!("{}", "  Not signed in".dimmed()),
    }
    Ok(())
}

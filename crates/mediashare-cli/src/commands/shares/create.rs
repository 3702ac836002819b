use mediashare_core::{Clock, NewShare};

use crate::app::AppContext;
use crate::cli::CreateArgs;
use crate::errors::share_error;
use crate::helpers::{
    parse_lifetime_hours, password_from_env, prompt_share_password, read_share_content,
};
use crate::output::{created_json, format_remaining};

pub fn handle_create(ctx: &AppContext, args: &CreateArgs) -> anyhow::Result<()> {
    let content = read_share_content(args.content.clone(), args.file.as_deref())?;

    let lifetime_hours = match args.lifetime.as_deref() {
        Some(value) => parse_lifetime_hours(value)?,
        None => ctx.config()?.limits.default_lifetime_hours,
    };

    let password = if args.password_prompt {
        Some(prompt_share_password()?)
    } else if args.no_password {
        None
    } else {
        password_from_env()
    };

    let store = ctx.open_store()?;

    let mut share = NewShare::new(content, lifetime_hours);
    if let Some(password) = password {
        share = share.with_password(password);
    }
    let id = store.create(share).map_err(share_error)?;
    let summary = store.describe(&id).map_err(share_error)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&created_json(&summary))?);
        return Ok(());
    }

    println!("{}", summary.id);
    if !ctx.quiet() {
        eprintln!(
            "Expires {} (in {}){}",
            summary.expires_at.to_rfc3339(),
            format_remaining(summary.expires_at - store.clock().now()),
            if summary.protected {
                ", password protected"
            } else {
                ""
            }
        );
    }
    Ok(())
}

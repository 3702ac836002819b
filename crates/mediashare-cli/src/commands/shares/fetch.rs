use std::io::{self, IsTerminal, Write};

use secrecy::{ExposeSecret, SecretString};

use mediashare_core::report::MediaReport;
use mediashare_core::ShareError;

use crate::app::AppContext;
use crate::cli::FetchArgs;
use crate::errors::share_error;
use crate::helpers::{parse_share_id, password_from_env, prompt_fetch_password};
use crate::output::{content_json, print_report, report_json};

pub fn handle_fetch(ctx: &AppContext, args: &FetchArgs) -> anyhow::Result<()> {
    let id = parse_share_id(&args.id)?;
    let store = ctx.open_store()?;

    let password = if args.password_prompt {
        Some(SecretString::from(prompt_fetch_password()?))
    } else {
        password_from_env().map(SecretString::from)
    };

    let outcome = store.fetch(&id, password.as_ref().map(|p| p.expose_secret()));
    let content = match outcome {
        Err(ShareError::AuthRequired) if !args.no_input && io::stdin().is_terminal() => {
            let password = SecretString::from(prompt_fetch_password()?);
            store.fetch(&id, Some(password.expose_secret()))
        }
        other => other,
    }
    .map_err(share_error)?;

    if args.summary {
        let report = MediaReport::parse(&String::from_utf8_lossy(&content));
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report_json(&id, &report))?);
        } else {
            print_report(&report);
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&content_json(&id, &content))?);
        return Ok(());
    }

    // Raw bytes, unmodified, so `fetch > report.txt` reproduces the upload.
    let mut stdout = io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}

use mediashare_core::Clock;

use crate::app::AppContext;
use crate::cli::InfoArgs;
use crate::errors::share_error;
use crate::helpers::parse_share_id;
use crate::output::{print_summary, summary_json};

pub fn handle_info(ctx: &AppContext, args: &InfoArgs) -> anyhow::Result<()> {
    let id = parse_share_id(&args.id)?;
    let store = ctx.open_store()?;
    let summary = store.describe(&id).map_err(share_error)?;
    let now = store.clock().now();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&summary, now))?);
    } else {
        print_summary(&summary, now);
    }
    Ok(())
}

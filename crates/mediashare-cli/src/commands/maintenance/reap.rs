use crate::app::AppContext;
use crate::cli::ReapArgs;
use crate::errors::share_error;

pub fn handle_reap(ctx: &AppContext, args: &ReapArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let removed = store.reap_now().map_err(share_error)?;

    if args.json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else if !ctx.quiet() {
        println!("Removed {} expired shares", removed);
    }
    Ok(())
}

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::{share_error, CliError};
use crate::helpers::parse_share_id;

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let id = parse_share_id(&args.id)?;
    let store = ctx.open_store()?;

    // Expired shares are purged by describe and report like missing ones.
    store.describe(&id).map_err(share_error)?;
    if !store.delete(&id).map_err(share_error)? {
        return Err(CliError::link_unavailable().into());
    }

    if !ctx.quiet() {
        println!("Deleted share {}", id);
    }
    Ok(())
}

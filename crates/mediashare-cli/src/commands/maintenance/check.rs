use crate::app::AppContext;
use crate::errors::CliError;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let persistence = store.persistence();

    if let Err(err) = persistence.check_integrity() {
        eprintln!("status=failed");
        return Err(CliError::IntegrityFailed(err.to_string()).into());
    }

    if !ctx.quiet() {
        let metadata = persistence.metadata()?;
        println!("check=sqlite ok");
        println!("check=metadata_keys ok");
        println!("check=sealed_entries ok");
        println!("check=expiry_order ok");
        println!("format_version={}", metadata.format_version);
        println!("entries={}", metadata.entry_count);
        println!("status=ok");
    }
    Ok(())
}

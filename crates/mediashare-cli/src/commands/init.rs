use std::path::PathBuf;

use mediashare_core::storage::SqlitePersistence;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, MediashareConfig};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let db_path = match args.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.db_path()?,
    };

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }

    let existed = db_path.exists();
    let persistence = SqlitePersistence::open(&db_path)?;
    let metadata = persistence.metadata()?;
    tracing::debug!(
        path = %db_path.display(),
        format_version = %metadata.format_version,
        existed,
        "share database ready"
    );

    let config_path = resolve_config_path()?;
    let wrote_config = if !config_path.exists() || args.force {
        write_config(&config_path, &MediashareConfig::new(db_path.clone()))?;
        true
    } else {
        false
    };

    if !ctx.quiet() {
        if existed {
            println!(
                "Share database already exists at {} ({} shares)",
                db_path.display(),
                metadata.entry_count
            );
        } else {
            println!("Created share database at {}", db_path.display());
        }
        if wrote_config {
            println!("Wrote config to {}", config_path.display());
        } else {
            println!(
                "Kept existing config at {} (use --force to overwrite)",
                config_path.display()
            );
        }
    }

    Ok(())
}

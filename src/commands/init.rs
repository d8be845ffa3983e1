use anyhow::Result;

use crate::commands::Context;
use cdx_license_resolver::init;

pub fn handle_init(ctx: &Context) -> Result<()> {
    let path = ctx.config_file();
    let added = init::generate_config_at_path(&path)?;

    if !ctx.quiet {
        if added.is_empty() {
            println!("✅ {} is already complete", path.display());
        } else {
            println!("✅ Configuration written to {} ({})", path.display(), added.join(", "));
        }
    }

    Ok(())
}

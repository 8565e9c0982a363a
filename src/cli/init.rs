use std::path::Path;

use catalog::Directory;
use tracing::instrument;

use crate::cli::terminal::{say, Tone};

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let created = Directory::new(root.to_path_buf())
            .init()
            .map_err(|e| anyhow::anyhow!("Failed to initialise catalog: {e}"))?;

        if created.is_empty() {
            say(
                Tone::Muted,
                format!("ℹ️  Catalog already initialised in {}", root.display()),
            );
            return Ok(());
        }

        println!("Initialised catalog in {}", root.display());
        for path in &created {
            let shown = path.strip_prefix(root).unwrap_or(path);
            println!("  Created: {}", shown.display());
        }

        println!();
        println!("Next steps:");
        println!("  catalog menu  # Log in as an administrator and add a library");

        Ok(())
    }
}

//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Polypress;

/// Remove the generated data tree
pub fn run(site: &Polypress) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = TempDir::new().unwrap();
        let site = Polypress::new(dir.path()).unwrap();
        fs::create_dir_all(site.public_dir.join("en/posts")).unwrap();
        fs::write(site.public_dir.join("routes.json"), "[]").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // A second clean is a no-op
        run(&site).unwrap();
    }
}

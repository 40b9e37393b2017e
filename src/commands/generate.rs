//! Generate the data tree

use anyhow::Result;

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::store::ContentStore;
use crate::Polypress;

/// Load the content store once and write every locale's data files
pub fn run(site: &Polypress) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let store = ContentStore::populate(&loader, &site.config)?;

    let generator = Generator::new(site, &store)?;
    let report = generator.generate(chrono::Utc::now())?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} files for {} locales in {:.2}s",
        report.files,
        report.locales,
        duration.as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[test]
    fn test_generate_scaffolded_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        let site = Polypress::new(dir.path()).unwrap();

        run(&site).unwrap();
        assert!(site.public_dir.join("en/posts/page/1.json").exists());
        assert!(site.public_dir.join("en/posts/hello-world.json").exists());
        assert!(site.public_dir.join("en/categories/general.json").exists());
        assert!(site.public_dir.join("en/pages/about.json").exists());
        assert!(site.public_dir.join("sitemap.json").exists());
    }
}

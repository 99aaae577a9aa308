pub mod catalog;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod source;

use chrono::Utc;
use tracing::{info, instrument};

use catalog::{build_catalog, CategoryTable};
use config::Config;
use error::Result;
use output::{write_catalog, write_manifest, Manifest};
use source::{load_category_records, load_food_records};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub food_records: usize,
    pub category_records: usize,
    pub skipped_lines: usize,
    pub categories: usize,
    pub foods: usize,
    pub modifiers: usize,
    pub files_written: usize,
}

/// Read both sources, build the catalog and write one file per category.
#[instrument(level = "info", skip(config), fields(food_des = %config.food_des.display()))]
pub fn run(config: &Config) -> Result<RunSummary> {
    let (foods, food_skipped) = load_food_records(&config.food_des, config.on_malformed)?;
    info!(records = foods.len(), skipped = food_skipped, "loaded food descriptions");

    let (groups, group_skipped) = load_category_records(&config.fd_group, config.on_malformed)?;
    info!(records = groups.len(), skipped = group_skipped, "loaded food groups");

    let catalog = build_catalog(&foods);
    let table = CategoryTable::from_records(&groups);
    let written = write_catalog(&catalog, &table, &config.output_dir)?;

    if let Some(path) = &config.manifest {
        let manifest = Manifest {
            generated_at: Utc::now(),
            food_des: &config.food_des,
            fd_group: &config.fd_group,
            output_dir: &config.output_dir,
            categories: &written,
        };
        write_manifest(path, &manifest)?;
        info!(path = %path.display(), "wrote manifest");
    }

    Ok(RunSummary {
        food_records: foods.len(),
        category_records: groups.len(),
        skipped_lines: food_skipped + group_skipped,
        categories: catalog.categories().len(),
        foods: catalog.food_count(),
        modifiers: catalog.modifier_count(),
        files_written: written.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MalformedPolicy;
    use crate::error::CatalogError;
    use anyhow::Result;
    use std::{fs, path::Path};
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,foodfacets=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn config_in(dir: &Path, food: &str, group: &str) -> Result<Config> {
        let food_des = dir.join("FOOD_DES.txt");
        let fd_group = dir.join("FD_GROUP.txt");
        fs::write(&food_des, food)?;
        fs::write(&fd_group, group)?;
        Ok(Config {
            food_des,
            fd_group,
            output_dir: dir.join("modifiers_by_food"),
            ..Config::default()
        })
    }

    #[test]
    fn end_to_end_single_record() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let config = config_in(
            dir.path(),
            "~1~^~100~^~Milk, whole, 3.5% fat~^~...~\n",
            "~100~^~Dairy and Egg Products~\n",
        )?;

        let summary = run(&config)?;
        assert_eq!(summary.files_written, 1);
        assert_eq!(summary.modifiers, 2);

        let text = fs::read_to_string(config.output_dir.join("DAIRY_AND_EGG_PRODUCTS.txt"))?;
        assert_eq!(text, "milk\twhole,three.five percent fat\n");
        Ok(())
    }

    #[test]
    fn end_to_end_usda_sample() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let food = "\
~01001~^~0100~^~Butter, salted~^~BUTTER,WITH SALT~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87\r
~01002~^~0100~^~Butter, whipped, with salt~^~BUTTER,WHIPPED,W/ SALT~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87\r
~01079~^~0100~^~Milk, reduced fat, fluid, 2% milkfat, with added vitamin A and vitamin D~^~MILK,RED FAT,FLUID,2% MILKFAT,W/ ADDED VIT A & VITAMIN D~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87\r
~05006~^~0500~^~Chicken, broilers or fryers, meat and skin, raw~^~CHICKEN,BROILERS OR FRYERS,MEAT&SKN,RAW~^~~^~~^~Y~^~~^0^~~^6.25^4.27^9.02^3.87\r
~01003~^~0100~^~Butter oil, anhydrous~^~BUTTER OIL,ANHYDROUS~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87\r
~01004~^~0100~^~Butter, salted~^~BUTTER,SALTED~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87\r
";
        let group = "~0100~^~Dairy and Egg Products~\r\n~0500~^~Poultry Products~\r\n~0600~^~Soups, Sauces, and Gravies~\r\n";
        let mut config = config_in(dir.path(), food, group)?;
        config.manifest = Some(dir.path().join("manifest.json"));

        let summary = run(&config)?;
        assert_eq!(
            summary,
            RunSummary {
                food_records: 6,
                category_records: 3,
                skipped_lines: 0,
                categories: 2,
                foods: 4,
                modifiers: 11,
                files_written: 2,
            }
        );

        let dairy = fs::read_to_string(config.output_dir.join("DAIRY_AND_EGG_PRODUCTS.txt"))?;
        assert_eq!(
            dairy,
            "butter\tsalted,whipped,with salt\n\
             milk\treduced fat,fluid,two percent milkfat,with added vitamin a and vitamin d\n\
             butter oil\tanhydrous\n"
        );
        let poultry = fs::read_to_string(config.output_dir.join("POULTRY_PRODUCTS.txt"))?;
        assert_eq!(poultry, "chicken\tbroilers or fryers,meat and skin,raw\n");
        assert!(!config.output_dir.join("SOUPS_SAUCES_AND_GRAVIES.txt").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("manifest.json"))?)?;
        assert_eq!(manifest["categories"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn missing_group_fails_run() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let config = config_in(
            dir.path(),
            "~1~^~100~^~Milk~^~MILK~\n~2~^~900~^~Apples, raw~^~APPLES~\n",
            "~100~^~Dairy and Egg Products~\n",
        )?;

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingCategoryLabel { ref code, line: 2 } if code == "900"
        ));
        assert!(!config.output_dir.exists());
        Ok(())
    }

    #[test]
    fn unused_letterless_group_does_not_block_output() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let config = config_in(
            dir.path(),
            "~1~^~100~^~Milk, whole~^~MILK~\n",
            "~100~^~Dairy and Egg Products~\n~999~^~2024 -- 1~\n",
        )?;

        let summary = run(&config)?;
        assert_eq!(summary.category_records, 2);
        assert_eq!(summary.files_written, 1);
        assert_eq!(
            fs::read_to_string(config.output_dir.join("DAIRY_AND_EGG_PRODUCTS.txt"))?,
            "milk\twhole\n"
        );
        Ok(())
    }

    #[test]
    fn used_letterless_group_fails_run() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let config = config_in(
            dir.path(),
            "~1~^~100~^~Milk~^~MILK~\n~2~^~999~^~Mystery~^~MYSTERY~\n",
            "~100~^~Dairy and Egg Products~\n~999~^~2024 -- 1~\n",
        )?;

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyCategoryLabel { ref code, line: 2 } if code == "999"
        ));
        assert!(!config.output_dir.exists());
        Ok(())
    }

    #[test]
    fn malformed_lines_abort_or_skip() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut config = config_in(
            dir.path(),
            "~1~^~100~^~Milk~^~MILK~\nnot a record\n",
            "~100~^~Dairy~\n",
        )?;

        let err = run(&config).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedFoodRecord { line: 2, .. }));

        config.on_malformed = MalformedPolicy::Skip;
        let summary = run(&config)?;
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(
            fs::read_to_string(config.output_dir.join("DAIRY.txt"))?,
            "milk\t\n"
        );
        Ok(())
    }
}

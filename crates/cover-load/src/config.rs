//! Run configuration.
//!
//! Values are layered: command-line overrides win over a TOML file, which
//! wins over built-in defaults. The TOML file is the `--config` path, else
//! the path in `COVER_CONFIG`, else `cover.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use cover_map::DEFAULT_FUZZY_THRESHOLD;
use cover_model::FinancialYear;

use crate::error::{LoadError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "COVER_CONFIG";

/// Config file picked up from the data directory.
pub const CONFIG_FILE_NAME: &str = "cover.toml";

pub const DEFAULT_DATABASE: &str = "data/vaccination_coverage.db";

const DEFAULT_REPORTING_YEAR_START: i32 = 2024;
const DEFAULT_FIRST_YEAR: i32 = 2009;
const DEFAULT_LAST_YEAR: i32 = 2024;

/// Start years accepted for the seeded range and the reporting year.
pub const YEAR_BOUNDS: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Financial years seeded into the year dimension, by start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

impl YearRange {
    pub fn iter(&self) -> impl Iterator<Item = FinancialYear> + use<> {
        (self.first..=self.last).map(FinancialYear::starting)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

/// Effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverConfig {
    /// SQLite database file.
    pub database: PathBuf,
    /// Year for single-year tables whose file name carries none.
    pub reporting_year: FinancialYear,
    pub fuzzy_threshold: f64,
    pub years: YearRange,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            reporting_year: FinancialYear::starting(DEFAULT_REPORTING_YEAR_START),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            years: YearRange::default(),
        }
    }
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub database: Option<PathBuf>,
    pub reporting_year: Option<String>,
    pub fuzzy_threshold: Option<f64>,
    #[serde(default)]
    pub years: YearsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearsSection {
    pub first: Option<i32>,
    pub last: Option<i32>,
}

impl ConfigFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| LoadError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<PathBuf>,
    pub reporting_year: Option<String>,
    pub fuzzy_threshold: Option<f64>,
}

impl CoverConfig {
    /// Locates and reads the config file, then applies `overrides`.
    pub fn load(
        explicit: Option<&Path>,
        data_dir: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let file = match locate_config(explicit, from_env.as_deref(), data_dir) {
            Some(path) => {
                info!(path = %path.display(), "Reading config file");
                Some(ConfigFile::read(&path)?)
            }
            None => None,
        };
        Self::layered(file, overrides)
    }

    /// Defaults, then `file`, then `overrides`; the result is validated.
    pub fn layered(file: Option<ConfigFile>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(database) = file.database {
                config.database = database;
            }
            if let Some(label) = file.reporting_year {
                config.reporting_year = parse_year(&label)?;
            }
            if let Some(threshold) = file.fuzzy_threshold {
                config.fuzzy_threshold = threshold;
            }
            if let Some(first) = file.years.first {
                config.years.first = first;
            }
            if let Some(last) = file.years.last {
                config.years.last = last;
            }
        }

        if let Some(database) = &overrides.database {
            config.database.clone_from(database);
        }
        if let Some(label) = &overrides.reporting_year {
            config.reporting_year = parse_year(label)?;
        }
        if let Some(threshold) = overrides.fuzzy_threshold {
            config.fuzzy_threshold = threshold;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(LoadError::InvalidConfig(format!(
                "fuzzy_threshold must be between 0 and 1, got {}",
                self.fuzzy_threshold
            )));
        }
        for (name, year) in [
            ("years.first", self.years.first),
            ("years.last", self.years.last),
            ("reporting_year", self.reporting_year.year_start),
        ] {
            if !YEAR_BOUNDS.contains(&year) {
                return Err(LoadError::InvalidConfig(format!(
                    "{name} ({year}) is outside {}..={}",
                    YEAR_BOUNDS.start(),
                    YEAR_BOUNDS.end()
                )));
            }
        }
        if self.years.first > self.years.last {
            return Err(LoadError::InvalidConfig(format!(
                "years.first ({}) is after years.last ({})",
                self.years.first, self.years.last
            )));
        }
        Ok(())
    }
}

fn parse_year(label: &str) -> Result<FinancialYear> {
    label.parse().map_err(|_| {
        LoadError::InvalidConfig(format!(
            "reporting_year '{label}' is not a financial year such as 2024-2025"
        ))
    })
}

/// Picks the config file: explicit path, then the environment, then
/// `cover.toml` in the data directory when it exists.
pub fn locate_config(
    explicit: Option<&Path>,
    from_env: Option<&Path>,
    data_dir: Option<&Path>,
) -> Option<PathBuf> {
    explicit
        .or(from_env)
        .map(Path::to_path_buf)
        .or_else(|| {
            data_dir
                .map(|dir| dir.join(CONFIG_FILE_NAME))
                .filter(|path| path.is_file())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> ConfigFile {
        ConfigFile::parse(text, Path::new("cover.toml")).unwrap()
    }

    #[test]
    fn defaults_without_file() {
        let config = CoverConfig::layered(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, CoverConfig::default());
        assert_eq!(config.reporting_year.label(), "2024-2025");
        assert_eq!(config.years.iter().count(), 16);
    }

    #[test]
    fn file_values_apply_and_overrides_win() {
        let file = parse(
            r#"
database = "file.db"
reporting_year = "2023-2024"
fuzzy_threshold = 0.9

[years]
first = 2015
"#,
        );
        let overrides = ConfigOverrides {
            database: Some(PathBuf::from("cli.db")),
            ..ConfigOverrides::default()
        };

        let config = CoverConfig::layered(Some(file), &overrides).unwrap();

        assert_eq!(config.database, PathBuf::from("cli.db"));
        assert_eq!(config.reporting_year, FinancialYear::starting(2023));
        assert_eq!(config.fuzzy_threshold, 0.9);
        assert_eq!(config.years.first, 2015);
        assert_eq!(config.years.last, 2024);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_threshold = ConfigOverrides {
            fuzzy_threshold: Some(1.5),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            CoverConfig::layered(None, &bad_threshold),
            Err(LoadError::InvalidConfig(_))
        ));

        let bad_year = ConfigOverrides {
            reporting_year: Some("2024".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(CoverConfig::layered(None, &bad_year).is_err());

        let reversed = parse("[years]\nfirst = 2020\nlast = 2010\n");
        assert!(CoverConfig::layered(Some(reversed), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn years_outside_bounds_are_rejected() {
        let huge = parse("[years]\nfirst = 2009\nlast = 2147483647\n");
        let err = CoverConfig::layered(Some(huge), &ConfigOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("years.last (2147483647)"));

        let ancient = parse("[years]\nfirst = -5\n");
        assert!(CoverConfig::layered(Some(ancient), &ConfigOverrides::default()).is_err());

        let far = ConfigOverrides {
            reporting_year: Some("2500-2501".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            CoverConfig::layered(None, &far),
            Err(LoadError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        let err = ConfigFile::parse("databse = \"typo.db\"", Path::new("cover.toml")).unwrap_err();
        assert!(matches!(err, LoadError::ConfigParse { .. }));
    }

    #[test]
    fn config_file_location_precedence() {
        let dir = TempDir::new().unwrap();
        let explicit = Path::new("/etc/cover/explicit.toml");
        let from_env = Path::new("/etc/cover/env.toml");

        assert_eq!(
            locate_config(Some(explicit), Some(from_env), Some(dir.path())),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            locate_config(None, Some(from_env), Some(dir.path())),
            Some(from_env.to_path_buf())
        );
        assert_eq!(locate_config(None, None, Some(dir.path())), None);

        let local = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&local, "fuzzy_threshold = 0.85\n").unwrap();
        assert_eq!(locate_config(None, None, Some(dir.path())), Some(local));
    }
}

//! Command-line interface for aster.

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::engine::Aster;
use crate::flatten::FlattenPolicy;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Find Go declarations by the comments above them.
///
/// Parses every Go file in a directory, matches each comment group against
/// a regular expression and prints the declaration that starts on the line
/// right after each matching group.
#[derive(Parser, Debug)]
#[command(name = "aster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The directory to parse
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Regular expression matched against comment groups (default: "aster:")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Only consider these packages (repeatable)
    #[arg(long = "package")]
    pub packages: Vec<String>,

    /// Print the package documentation instead of matching comments
    #[arg(long)]
    pub package_comment: bool,

    /// Output format: pretty or json
    #[arg(short, long)]
    pub format: Option<String>,

    /// Fail on matched declarations that are neither functions nor structs
    #[arg(long)]
    pub strict: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Settings after merging the config file and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub directory: PathBuf,
    pub pattern: String,
    pub packages: Vec<String>,
    pub format: String,
    pub policy: FlattenPolicy,
}

impl Cli {
    /// Command-line flags override config values.
    pub fn settings(&self, config: &Config) -> anyhow::Result<Settings> {
        let directory = match &self.directory {
            Some(d) if !d.as_os_str().is_empty() => d.clone(),
            _ => anyhow::bail!("must provide a value for the directory to be parsed"),
        };

        let format = self
            .format
            .clone()
            .unwrap_or_else(|| config.get_format().to_string());
        if format != "pretty" && format != "json" {
            anyhow::bail!("invalid format {:?}, must be 'pretty' or 'json'", format);
        }

        let packages = if self.packages.is_empty() {
            config.packages.clone()
        } else {
            self.packages.clone()
        };

        let policy = if self.strict || config.strict {
            FlattenPolicy::Strict
        } else {
            FlattenPolicy::Permissive
        };

        Ok(Settings {
            directory,
            pattern: self
                .pattern
                .clone()
                .unwrap_or_else(|| config.get_pattern().to_string()),
            packages,
            format,
            policy,
        })
    }

    /// Load the explicit config file, or a discovered one, or defaults.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let path = match &self.config {
            Some(p) => p.clone(),
            None => match config::discover(&std::env::current_dir()?) {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        debug!(config = %path.display(), "loading config");
        Config::parse_file(&path)
            .map_err(|e| anyhow::anyhow!("error parsing config {}: {}", path.display(), e))
    }
}

/// Run the command.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = cli.load_config()?;
    let settings = cli.settings(&config)?;

    info!(dir = %settings.directory.display(), "parsing");
    let mut aster = Aster::from_directory(&settings.directory).with_policy(settings.policy);
    if !settings.packages.is_empty() {
        aster.filter_packages(&settings.packages);
    }

    if cli.package_comment {
        if let Some(err) = aster.error() {
            anyhow::bail!("could not retrieve package comment: {}", err);
        }
        print!("{}", aster.package_comment());
        return Ok(EXIT_SUCCESS);
    }

    let results = aster
        .find_by_comment(&settings.pattern)
        .map_err(|e| anyhow::anyhow!("could not retrieve results: {}", e))?;

    for r in &results {
        info!(name = %r.name, kind = %r.kind, "result found");
    }

    report::write_results(
        &settings.format,
        &settings.directory.to_string_lossy(),
        &settings.pattern,
        &settings.packages,
        &results,
    )?;

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_required() {
        let cli = Cli::parse_from(["aster"]);
        let err = cli.settings(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_empty_directory_rejected() {
        // clap refuses an empty path value before settings are built.
        assert!(Cli::try_parse_from(["aster", "-d", ""]).is_err());

        let cli = Cli {
            directory: Some(PathBuf::new()),
            ..Cli::parse_from(["aster"])
        };
        let err = cli.settings(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["aster", "-d", "sample"]);
        let settings = cli.settings(&Config::default()).unwrap();
        assert_eq!(
            settings,
            Settings {
                directory: PathBuf::from("sample"),
                pattern: "aster:".to_string(),
                packages: vec![],
                format: "pretty".to_string(),
                policy: FlattenPolicy::Permissive,
            }
        );
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            pattern: Some("cfg:".to_string()),
            packages: vec!["fromconfig".to_string()],
            strict: false,
            format: Some("json".to_string()),
        };

        let cli = Cli::parse_from(["aster", "-d", "src"]);
        let settings = cli.settings(&config).unwrap();
        assert_eq!(settings.pattern, "cfg:");
        assert_eq!(settings.packages, vec!["fromconfig"]);
        assert_eq!(settings.format, "json");

        let cli = Cli::parse_from([
            "aster", "-d", "src", "-p", "cli:", "--package", "a", "--package", "b", "-f",
            "pretty", "--strict",
        ]);
        let settings = cli.settings(&config).unwrap();
        assert_eq!(settings.pattern, "cli:");
        assert_eq!(settings.packages, vec!["a", "b"]);
        assert_eq!(settings.format, "pretty");
        assert_eq!(settings.policy, FlattenPolicy::Strict);
    }

    #[test]
    fn test_invalid_format() {
        let cli = Cli::parse_from(["aster", "-d", "src", "-f", "xml"]);
        assert!(cli.settings(&Config::default()).is_err());
    }
}

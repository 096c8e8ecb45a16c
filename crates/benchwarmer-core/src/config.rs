// Configuration loading and parsing (league.toml, credentials.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable overriding `credentials.espn_s2`.
pub const ENV_ESPN_S2: &str = "ESPN_S2";
/// Environment variable overriding `credentials.swid`.
pub const ENV_ESPN_SWID: &str = "ESPN_SWID";

const LEAGUE_FILE: &str = "league.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub espn: EspnConfig,
    pub report: ReportConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    espn: EspnConfig,
    #[serde(default)]
    report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// ESPN league id.
    pub id: u64,
    /// Seasons to report on. The first one is the default view and the only
    /// one used for usage-share pages.
    pub seasons: Vec<u16>,
    /// Display name override. When omitted, ESPN's league name is used.
    #[serde(default)]
    pub name: Option<String>,
}

impl LeagueConfig {
    pub fn default_season(&self) -> Option<u16> {
        self.seasons.first().copied()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EspnConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: String,
    pub high_club_threshold: f64,
    pub low_club_threshold: f64,
    pub fraud_points_for_weight: f64,
    pub fraud_points_against_weight: f64,
    pub top_players: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            high_club_threshold: 200.0,
            low_club_threshold: 100.0,
            fraud_points_for_weight: 0.75,
            fraud_points_against_weight: 0.5,
            top_players: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// ESPN session cookies for private leagues. Public leagues need neither.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub espn_s2: Option<String>,
    pub swid: Option<String>,
}

impl CredentialsConfig {
    pub fn is_configured(&self) -> bool {
        self.espn_s2.is_some() && self.swid.is_some()
    }

    /// Replace file values with non-empty values from `lookup` (normally the
    /// process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(s2) = lookup(ENV_ESPN_S2).filter(|v| !v.trim().is_empty()) {
            self.espn_s2 = Some(s2);
        }
        if let Some(swid) = lookup(ENV_ESPN_SWID).filter(|v| !v.trim().is_empty()) {
            self.swid = Some(swid);
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and (optionally)
/// `config/credentials.toml`, both relative to `base_dir`.
///
/// Environment overrides are not applied here; see `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join(LEAGUE_FILE);
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join(CREDENTIALS_FILE);
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league: league_file.league,
        espn: league_file.espn,
        report: league_file.report,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Files `ensure_config_files` seeds from `defaults/`. Credentials are never
/// seeded; `defaults/credentials.toml.example` is a template to copy by hand.
pub const SEEDED_FILES: &[&str] = &[LEAGUE_FILE];

/// Copy each of `SEEDED_FILES` from `defaults/` into `config/` unless
/// `config/` already has it. Returns the files written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };

    let mut copied = Vec::new();
    for name in SEEDED_FILES {
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(copy_error(format!(
                "no config/{name} and no defaults/{name} under {}; \
                 run from the project root",
                base_dir.display()
            )));
        }

        std::fs::create_dir_all(&config_dir)
            .map_err(|e| copy_error(format!("failed to create {}: {e}", config_dir.display())))?;

        // Never overwrite.
        let mut dest = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(dest) => dest,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(copy_error(format!("failed to create {}: {e}", target.display()))),
        };
        let mut src = std::fs::File::open(&source)
            .map_err(|e| copy_error(format!("failed to read {}: {e}", source.display())))?;
        std::io::copy(&mut src, &mut dest)
            .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;

        info!("Seeded {} from defaults", target.display());
        copied.push(target);
    }

    if !config_dir.join(CREDENTIALS_FILE).exists() {
        info!(
            "No config/{CREDENTIALS_FILE}; private leagues need it or {ENV_ESPN_S2}/{ENV_ESPN_SWID}"
        );
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, seeding defaults first and applying `ESPN_S2` / `ESPN_SWID`
/// environment overrides last.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    config
        .credentials
        .apply_overrides(|key| std::env::var(key).ok());
    validate_credentials(&config.credentials)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.id == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.id".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.league.seasons.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.seasons".into(),
            message: "must list at least one season".into(),
        });
    }

    let mut seen = HashSet::new();
    for season in &config.league.seasons {
        if !seen.insert(season) {
            return Err(ConfigError::ValidationError {
                field: "league.seasons".into(),
                message: format!("season {season} is listed more than once"),
            });
        }
    }

    if config.espn.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "espn.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    if config.espn.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "espn.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let report = &config.report;
    if report.low_club_threshold >= report.high_club_threshold {
        return Err(ConfigError::ValidationError {
            field: "report.low_club_threshold".into(),
            message: format!(
                "must be below report.high_club_threshold ({}), got {}",
                report.high_club_threshold, report.low_club_threshold
            ),
        });
    }

    let weight_fields: &[(&str, f64)] = &[
        ("report.fraud_points_for_weight", report.fraud_points_for_weight),
        (
            "report.fraud_points_against_weight",
            report.fraud_points_against_weight,
        ),
    ];
    for (name, val) in weight_fields {
        if *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be >= 0, got {val}"),
            });
        }
    }

    if report.top_players == 0 {
        return Err(ConfigError::ValidationError {
            field: "report.top_players".into(),
            message: "must be > 0".into(),
        });
    }

    validate_credentials(&config.credentials)
}

fn validate_credentials(credentials: &CredentialsConfig) -> Result<(), ConfigError> {
    match (&credentials.espn_s2, &credentials.swid) {
        (Some(_), None) => Err(ConfigError::ValidationError {
            field: "credentials.swid".into(),
            message: "espn_s2 is set but swid is missing".into(),
        }),
        (None, Some(_)) => Err(ConfigError::ValidationError {
            field: "credentials.espn_s2".into(),
            message: "swid is set but espn_s2 is missing".into(),
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the workspace root holding `defaults/`
    /// (works whether `cargo test` runs from the crate dir or the repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/league.toml` copied from defaults.
    fn temp_config_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            tmp.join("config/league.toml"),
        )
        .unwrap();
        tmp
    }

    fn with_modified_league(name: &str, from: &str, to: &str) -> PathBuf {
        let tmp = temp_config_dir(name);
        let path = tmp.join("config/league.toml");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "default league.toml lacks `{from}`");
        fs::write(&path, text.replace(from, to)).unwrap();
        tmp
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        let err = load_config_from(tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_default_files() {
        let tmp = temp_config_dir("bw_config_test_defaults");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.id, 953181335);
        assert_eq!(config.league.seasons, vec![2025, 2024]);
        assert_eq!(config.league.default_season(), Some(2025));
        assert!(config.league.name.is_none());

        assert_eq!(
            config.espn.base_url,
            "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl"
        );
        assert_eq!(config.espn.timeout_secs, 30);

        assert_eq!(config.report.output_dir, "output");
        assert!((config.report.high_club_threshold - 200.0).abs() < f64::EPSILON);
        assert!((config.report.low_club_threshold - 100.0).abs() < f64::EPSILON);
        assert!((config.report.fraud_points_for_weight - 0.75).abs() < f64::EPSILON);
        assert!((config.report.fraud_points_against_weight - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.report.top_players, 3);

        assert!(!config.credentials.is_configured());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn report_section_is_optional() {
        let tmp = std::env::temp_dir().join("bw_config_test_no_report");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join("config/league.toml"),
            r#"
[league]
id = 12345
seasons = [2023]
name = "Override"

[espn]
base_url = "http://localhost"
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load without [report]");
        assert_eq!(config.league.name.as_deref(), Some("Override"));
        assert_eq!(config.report.top_players, 3);
        assert_eq!(config.report.output_dir, "output");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_cookies() {
        let tmp = temp_config_dir("bw_config_test_with_creds");
        fs::write(
            tmp.join("config/credentials.toml"),
            "espn_s2 = \"s2-cookie\"\nswid = \"{ABC-123}\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(config.credentials.espn_s2.as_deref(), Some("s2-cookie"));
        assert_eq!(config.credentials.swid.as_deref(), Some("{ABC-123}"));
        assert!(config.credentials.is_configured());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_half_configured_credentials() {
        let tmp = temp_config_dir("bw_config_test_half_creds");
        fs::write(tmp.join("config/credentials.toml"), "espn_s2 = \"s2-cookie\"\n").unwrap();
        expect_validation_field(&tmp, "credentials.swid");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut creds = CredentialsConfig {
            espn_s2: Some("file".into()),
            swid: None,
        };
        creds.apply_overrides(|key| match key {
            ENV_ESPN_S2 => Some("env-s2".into()),
            ENV_ESPN_SWID => Some("{ENV}".into()),
            _ => None,
        });
        assert_eq!(creds.espn_s2.as_deref(), Some("env-s2"));
        assert_eq!(creds.swid.as_deref(), Some("{ENV}"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut creds = CredentialsConfig {
            espn_s2: Some("file".into()),
            swid: Some("{FILE}".into()),
        };
        creds.apply_overrides(|_| Some("   ".into()));
        assert_eq!(creds.espn_s2.as_deref(), Some("file"));
        assert_eq!(creds.swid.as_deref(), Some("{FILE}"));
    }

    #[test]
    fn rejects_league_id_zero() {
        let tmp = with_modified_league("bw_config_test_id_zero", "id = 953181335", "id = 0");
        expect_validation_field(&tmp, "league.id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_seasons() {
        let tmp = with_modified_league(
            "bw_config_test_no_seasons",
            "seasons = [2025, 2024]",
            "seasons = []",
        );
        expect_validation_field(&tmp, "league.seasons");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_seasons() {
        let tmp = with_modified_league(
            "bw_config_test_dup_seasons",
            "seasons = [2025, 2024]",
            "seasons = [2025, 2025]",
        );
        expect_validation_field(&tmp, "league.seasons");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = with_modified_league(
            "bw_config_test_zero_timeout",
            "timeout_secs = 30",
            "timeout_secs = 0",
        );
        expect_validation_field(&tmp, "espn.timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_club_thresholds() {
        let tmp = with_modified_league(
            "bw_config_test_thresholds",
            "low_club_threshold = 100.0",
            "low_club_threshold = 250.0",
        );
        expect_validation_field(&tmp, "report.low_club_threshold");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_fraud_weight() {
        let tmp = with_modified_league(
            "bw_config_test_neg_weight",
            "fraud_points_against_weight = 0.5",
            "fraud_points_against_weight = -0.5",
        );
        expect_validation_field(&tmp, "report.fraud_points_against_weight");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_top_players() {
        let tmp = with_modified_league(
            "bw_config_test_zero_top",
            "top_players = 3",
            "top_players = 0",
        );
        expect_validation_field(&tmp, "report.top_players");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("bw_config_test_missing_league");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("bw_config_test_invalid_toml");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("bw_config_test_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            defaults_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "espn_s2 = \"...\"\nswid = \"{...}\"\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("bw_config_test_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            defaults_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("bw_config_test_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("no config/league.toml and no defaults/league.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_needs_no_defaults_once_configured() {
        let tmp = std::env::temp_dir().join("bw_config_test_configured_only");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        assert!(!tmp.join("defaults").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_ignores_unlisted_defaults() {
        let tmp = std::env::temp_dir().join("bw_config_test_unlisted_defaults");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            defaults_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(defaults_dir.join("credentials.toml"), "espn_s2 = \"x\"\n").unwrap();
        fs::write(defaults_dir.join("notes.txt"), "scratch\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied, vec![tmp.join("config/league.toml")]);
        assert!(!tmp.join("config/credentials.toml").exists());
        assert!(!tmp.join("config/notes.txt").exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}

pub mod convert;
pub mod ladder;
pub mod probe;

pub use ladder::{Orientation, ResolutionMap, Rung};
pub use probe::{ProbeError, Resolution};

const DEFAULT_CONFIG_PATH: &str = "vrescale.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encoder: EncoderConfig,
    pub resolutions: ResolutionMap,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ffprobe: String,
    pub ffmpeg: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_owned(),
            ffmpeg: "ffmpeg".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Passed to the transcoder after the scale filter, before the output path.
    pub ffmpeg_args: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_args: vec!["-c:a".to_owned(), "copy".to_owned()],
        }
    }
}

impl Config {
    pub fn from_toml(body: &str) -> Result<Self, anyhow::Error> {
        let config: Self = toml::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.tools.ffprobe.is_empty() {
            anyhow::bail!("tools.ffprobe must not be empty");
        }
        if self.tools.ffmpeg.is_empty() {
            anyhow::bail!("tools.ffmpeg must not be empty");
        }
        self.resolutions.validate()
    }
}

/// Reads `path` if given, otherwise `vrescale.toml` in the working directory
/// when it exists. Without either, the built-in ladder is used.
pub fn load_config(path: Option<&std::path::Path>) -> Result<Config, anyhow::Error> {
    load_config_from(std::path::Path::new("."), path)
}

/// Same as [`load_config`], with `dir` standing in for the working directory.
pub fn load_config_from(
    dir: &std::path::Path,
    path: Option<&std::path::Path>,
) -> Result<Config, anyhow::Error> {
    use anyhow::Context as _;

    let default_path;
    let path = match path {
        Some(path) => path,
        None => {
            default_path = dir.join(DEFAULT_CONFIG_PATH);
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path.as_path()
        }
    };
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = Config::from_toml(&body)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[derive(Debug)]
pub struct RungOutcome {
    pub rung: Rung,
    pub output: std::path::PathBuf,
    pub result: Result<(), anyhow::Error>,
}

#[derive(Debug)]
pub struct Report {
    pub resolution: Resolution,
    pub orientation: Orientation,
    pub outcomes: Vec<RungOutcome>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }
}

/// Probes `input` and transcodes it once per rung of the ladder matching its
/// orientation, one after another. A probe failure is returned before any
/// transcoder runs; a failed rung is reported and the remaining rungs still run.
pub async fn rescale(
    config: &Config,
    input: &std::path::Path,
    dry_run: bool,
) -> Result<Report, anyhow::Error> {
    use anyhow::Context as _;

    let resolution = probe::probe_resolution(config, input)
        .await
        .context("failed to detect video resolution")?;
    let orientation = resolution.orientation();
    log::info!("{}: {} ({})", input.display(), resolution, orientation);

    let mut outcomes = Vec::new();
    for rung in config.resolutions.rungs(orientation) {
        let output = convert::output_path(input, rung);
        let result = if dry_run {
            let args = convert::convert_args(config, input, rung, &output);
            println!("{}", convert::command_line(&config.tools.ffmpeg, &args));
            Ok(())
        } else {
            let result = convert::convert(config, input, rung, &output).await;
            match &result {
                Ok(()) => println!(
                    "Converted to {}p and saved as {}",
                    rung.label,
                    output.display()
                ),
                Err(e) => log::error!("Failed to convert to {}p: {:#}", rung.label, e),
            }
            result
        };
        outcomes.push(RungOutcome {
            rung: rung.clone(),
            output,
            result,
        });
    }

    Ok(Report {
        resolution,
        orientation,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
        assert_eq!(config.encoder.ffmpeg_args, vec!["-c:a", "copy"]);
        assert_eq!(config.resolutions, ResolutionMap::default());
    }

    #[test]
    fn partial_resolutions_keep_other_orientation() {
        let config = Config::from_toml(
            r#"
            [tools]
            ffmpeg = "/opt/ffmpeg/bin/ffmpeg"

            [resolutions]
            horizontal = [{ label = "1080", height = 1080 }, { label = "540", height = 540 }]
            "#,
        )
        .unwrap();
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_eq!(config.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(
            config.resolutions.horizontal,
            vec![Rung::new("1080", 1080), Rung::new("540", 540)]
        );
        assert_eq!(
            config.resolutions.vertical,
            ResolutionMap::default().vertical
        );
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        let err = Config::from_toml(
            r#"
            [resolutions]
            diagonal = [{ label = "720", height = 720 }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("diagonal"), "{}", err);
    }

    #[test]
    fn empty_tool_is_rejected() {
        let err = Config::from_toml("[tools]\nffprobe = \"\"\n").unwrap_err();
        assert_eq!(err.to_string(), "tools.ffprobe must not be empty");
    }

    #[test]
    fn explicit_config_must_exist() {
        let err = load_config(Some(std::path::Path::new("/nonexistent/vrescale.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"), "{}", err);
    }

    #[test]
    fn loads_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[encoder]\nffmpeg_args = [\"-an\"]\n").unwrap();
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.encoder.ffmpeg_args, vec!["-an"]);
    }

    #[test]
    fn invalid_config_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(
            &path,
            "[resolutions]\nvertical = [{ label = \"hd\", height = 720 }]\n",
        )
        .unwrap();
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.toml"), "{:#}", err);
        assert!(format!("{:#}", err).contains("not a number"), "{:#}", err);
    }

    #[test]
    fn default_file_in_working_directory_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vrescale.toml"),
            "[tools]\nffmpeg = \"/usr/local/bin/ffmpeg\"\n",
        )
        .unwrap();
        let config = load_config_from(dir.path(), None).unwrap();
        assert_eq!(config.tools.ffmpeg, "/usr/local/bin/ffmpeg");
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_ne!(config, Config::default());
    }

    #[test]
    fn no_default_file_means_builtin_ladder() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_path_wins_over_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vrescale.toml"), "[tools]\nffmpeg = \"a\"\n").unwrap();
        let other = dir.path().join("other.toml");
        std::fs::write(&other, "[tools]\nffmpeg = \"b\"\n").unwrap();
        let config = load_config_from(dir.path(), Some(other.as_path())).unwrap();
        assert_eq!(config.tools.ffmpeg, "b");
    }

    #[test]
    fn broken_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vrescale.toml"), "[tools\n").unwrap();
        let err = load_config_from(dir.path(), None).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"), "{:#}", err);
        assert!(err.to_string().contains("vrescale.toml"), "{:#}", err);
    }
}

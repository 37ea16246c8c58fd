//! Runner configuration loaded from `puckman.toml`.
//!
//! Every key is optional; a missing default file yields the built-in settings.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use puckman_core::Direction;
use serde::Deserialize;
use tracing::debug;

/// File consulted when no `--config` flag is given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "puckman.toml";

/// Resolved runner settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) tick_rate: Duration,
    pub(crate) ticks: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) realtime: bool,
    pub(crate) layout_path: Option<PathBuf>,
    pub(crate) inputs: Vec<ScriptedInput>,
}

/// Player input replayed on a fixed loop tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedInput {
    pub(crate) tick: u64,
    pub(crate) action: InputAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputAction {
    Heading(Direction),
    TogglePause,
    ResetGhosts,
}

impl Settings {
    /// Inputs scheduled for the provided loop tick, in file order.
    pub(crate) fn inputs_at(&self, tick: u64) -> impl Iterator<Item = InputAction> + '_ {
        self.inputs
            .iter()
            .filter(move |input| input.tick == tick)
            .map(|input| input.action)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(default_tick_rate()),
            ticks: default_ticks(),
            seed: None,
            realtime: false,
            layout_path: None,
            inputs: Vec::new(),
        }
    }
}

/// Reads settings from `path`, or from [`DEFAULT_CONFIG_PATH`] when it exists.
pub(crate) fn load(path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if !required && error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file found, using defaults");
            return Ok(Settings::default());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config at {}", path.display()))
        }
    };

    let settings =
        parse(&contents).with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(anchor_layout_path(settings, &path))
}

/// Resolves a relative `[layout] path` against the directory holding the config file.
fn anchor_layout_path(mut settings: Settings, config_path: &Path) -> Settings {
    if let Some(parent) = config_path.parent() {
        settings.layout_path = settings.layout_path.map(|layout| parent.join(layout));
    }
    settings
}

pub(crate) fn parse(contents: &str) -> Result<Settings> {
    let file: TomlConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    if file.simulation.tick_rate_ms == 0 {
        bail!("simulation.tick_rate_ms must be positive");
    }

    let inputs = file
        .input
        .into_iter()
        .map(TomlInput::resolve)
        .collect::<Result<Vec<_>>>()?;

    Ok(Settings {
        tick_rate: Duration::from_millis(file.simulation.tick_rate_ms),
        ticks: file.simulation.ticks,
        seed: file.simulation.seed,
        realtime: file.simulation.realtime,
        layout_path: file.layout.path,
        inputs,
    })
}

// ── TOML schema ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    simulation: TomlSimulation,
    #[serde(default)]
    layout: TomlLayout,
    #[serde(default)]
    input: Vec<TomlInput>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlSimulation {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_ticks")]
    ticks: u64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    realtime: bool,
}

impl Default for TomlSimulation {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            ticks: default_ticks(),
            seed: None,
            realtime: false,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlLayout {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlInput {
    tick: u64,
    #[serde(default)]
    heading: Option<Direction>,
    #[serde(default)]
    action: Option<TomlAction>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum TomlAction {
    TogglePause,
    ResetGhosts,
}

impl TomlInput {
    fn resolve(self) -> Result<ScriptedInput> {
        let action = match (self.heading, self.action) {
            (Some(direction), None) => InputAction::Heading(direction),
            (None, Some(TomlAction::TogglePause)) => InputAction::TogglePause,
            (None, Some(TomlAction::ResetGhosts)) => InputAction::ResetGhosts,
            (Some(_), Some(_)) => {
                bail!("input at tick {} sets both a heading and an action", self.tick)
            }
            (None, None) => bail!("input at tick {} needs a heading or an action", self.tick),
        };
        Ok(ScriptedInput {
            tick: self.tick,
            action,
        })
    }
}

fn default_tick_rate() -> u64 {
    100
}

fn default_ticks() -> u64 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse("").expect("empty config is valid");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_rate, Duration::from_millis(100));
        assert_eq!(settings.ticks, 200);
    }

    #[test]
    fn parses_full_config() {
        let settings = parse(
            r#"
            [simulation]
            tick_rate_ms = 50
            ticks = 30
            seed = 9
            realtime = true

            [layout]
            path = "mazes/tiny.toml"

            [[input]]
            tick = 0
            heading = "west"

            [[input]]
            tick = 12
            action = "toggle_pause"

            [[input]]
            tick = 12
            action = "reset_ghosts"
            "#,
        )
        .expect("valid config");

        assert_eq!(settings.tick_rate, Duration::from_millis(50));
        assert_eq!(settings.ticks, 30);
        assert_eq!(settings.seed, Some(9));
        assert!(settings.realtime);
        assert_eq!(settings.layout_path, Some(PathBuf::from("mazes/tiny.toml")));
        assert_eq!(
            settings.inputs_at(0).collect::<Vec<_>>(),
            vec![InputAction::Heading(Direction::West)]
        );
        assert_eq!(
            settings.inputs_at(12).collect::<Vec<_>>(),
            vec![InputAction::TogglePause, InputAction::ResetGhosts]
        );
        assert_eq!(settings.inputs_at(5).count(), 0);
    }

    #[test]
    fn rejects_ambiguous_input() {
        let error = parse(
            r#"
            [[input]]
            tick = 3
            heading = "north"
            action = "reset_ghosts"
            "#,
        )
        .expect_err("heading and action are exclusive");
        assert!(error.to_string().contains("tick 3"));
    }

    #[test]
    fn rejects_unknown_keys_and_zero_tick_rate() {
        assert!(parse("[simulation]\nspeed = 3\n").is_err());
        assert!(parse("[simulation]\ntick_rate_ms = 0\n").is_err());
    }

    #[test]
    fn layout_path_is_relative_to_the_config_file() {
        let settings = parse("[layout]\npath = \"mazes/tunnel.toml\"\n").expect("valid config");

        let nested = anchor_layout_path(settings.clone(), Path::new("some/dir/puckman.toml"));
        assert_eq!(
            nested.layout_path,
            Some(PathBuf::from("some/dir/mazes/tunnel.toml"))
        );

        let local = anchor_layout_path(settings, Path::new(DEFAULT_CONFIG_PATH));
        assert_eq!(local.layout_path, Some(PathBuf::from("mazes/tunnel.toml")));
    }

    #[test]
    fn absolute_layout_path_is_kept() {
        let settings =
            parse("[layout]\npath = \"/srv/mazes/tunnel.toml\"\n").expect("valid config");
        let anchored = anchor_layout_path(settings, Path::new("some/dir/puckman.toml"));
        assert_eq!(
            anchored.layout_path,
            Some(PathBuf::from("/srv/mazes/tunnel.toml"))
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = Path::new("definitely/not/here/puckman.toml");
        assert!(load(Some(path)).is_err());
    }
}

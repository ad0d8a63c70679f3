use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const DEFAULT_PATH: &str = "multigame.json";
/// Environment variable overriding [`DEFAULT_PATH`].
pub const PATH_VAR: &str = "MULTIGAME_CONFIG";

#[derive(Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    /// TTF font used for all text. The built-in font is used when absent.
    pub font: Option<String>,
    /// Log filter in `env_logger` syntax.
    pub log: Option<String>,
    pub lines: LinesConfig,
    pub click_lines: ClickLinesConfig,
    pub snake: SnakeConfig,
    pub tetris: TetrisConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinesConfig {
    pub size: usize,
    pub colors: usize,
    /// Balls on the board at start.
    pub initial: usize,
    /// Balls added after each move that removes nothing.
    pub spawn: usize,
    /// Shortest line that gets removed.
    pub line: usize,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            size: 9,
            colors: 7,
            initial: 5,
            spawn: 3,
            line: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickLinesConfig {
    pub width: usize,
    pub height: usize,
    pub colors: usize,
}

impl Default for ClickLinesConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            colors: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnakeConfig {
    pub width: usize,
    pub height: usize,
    /// Step interval at start, in milliseconds.
    pub step_ms: u64,
    pub min_step_ms: u64,
    /// How much each eaten food shortens the step.
    pub speedup_ms: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            step_ms: 180,
            min_step_ms: 60,
            speedup_ms: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TetrisConfig {
    pub width: usize,
    pub height: usize,
    /// Gravity interval at level 1, in milliseconds.
    pub step_ms: u64,
    pub min_step_ms: u64,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            step_ms: 800,
            min_step_ms: 80,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        let lines = &self.lines;
        anyhow::ensure!(lines.size >= 2, "lines.size must be at least 2");
        anyhow::ensure!(
            (1..=PALETTE_SIZE).contains(&lines.colors),
            "lines.colors must be within 1..={PALETTE_SIZE}"
        );
        anyhow::ensure!(lines.line >= 2, "lines.line must be at least 2");
        anyhow::ensure!(
            lines.initial < lines.size * lines.size,
            "lines.initial must leave free cells"
        );
        let click = &self.click_lines;
        anyhow::ensure!(
            click.width > 0 && click.height > 0,
            "click_lines board must not be empty"
        );
        anyhow::ensure!(
            (1..=PALETTE_SIZE).contains(&click.colors),
            "click_lines.colors must be within 1..={PALETTE_SIZE}"
        );
        let snake = &self.snake;
        anyhow::ensure!(
            snake.width >= 4 && snake.height >= 2,
            "snake field must be at least 4x2"
        );
        anyhow::ensure!(snake.min_step_ms > 0, "snake.min_step_ms must be positive");
        let tetris = &self.tetris;
        anyhow::ensure!(
            tetris.width >= 4 && tetris.height >= 4,
            "tetris well must be at least 4x4"
        );
        anyhow::ensure!(tetris.min_step_ms > 0, "tetris.min_step_ms must be positive");
        Ok(())
    }
}

/// Number of distinct ball colors the games can draw.
pub const PALETTE_SIZE: usize = crate::games::PALETTE.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_section() {
        let config = Config::from_json(r#"{ "snake": { "width": 30 }, "font": "a.ttf" }"#).unwrap();
        assert_eq!(config.snake.width, 30);
        assert_eq!(config.snake.height, SnakeConfig::default().height);
        assert_eq!(config.font.as_deref(), Some("a.ttf"));
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(Config::from_json(r#"{ "tetris": { "depth": 3 } }"#).is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(Config::from_json(r#"{ "lines": { "colors": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "lines": { "size": 2, "initial": 4 } }"#).is_err());
        assert!(Config::from_json(r#"{ "snake": { "min_step_ms": 0 } }"#).is_err());
    }

    #[test]
    fn missing_file_gives_default() {
        let config = Config::load(Path::new("/nonexistent/multigame.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}

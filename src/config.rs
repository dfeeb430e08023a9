use crate::events::Hotkey;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub hotkeys: HotkeysConfig,
    pub spawn: SpawnConfig,
    pub close: CloseConfig,
    pub dispatcher: DispatcherConfig,
    // Разобранные горячие клавиши - не сериализуются, строятся после загрузки
    #[serde(skip)]
    parsed_hotkeys: Option<(Hotkey, Hotkey)>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Дополнительные директивы EnvFilter, например `hotkey_tiler::layout=debug`
    #[serde(default)]
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
    /// Захватить клавиатуру эксклюзивно: горячие клавиши не доходят до приложений,
    /// остальные события пробрасываются через uinput
    #[serde(default)]
    pub grab: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HotkeysConfig {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpawnConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub window_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloseConfig {
    pub settle_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatcherConfig {
    pub queue_capacity: usize,
}

impl SpawnConfig {
    pub fn window_timeout(&self) -> Duration {
        Duration::from_millis(self.window_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl CloseConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: String::new(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                grab: false,
            },
            hotkeys: HotkeysConfig {
                open: "ctrl+alt+x".to_string(),
                close: "ctrl+alt+c".to_string(),
            },
            spawn: SpawnConfig {
                command: "xterm".to_string(),
                args: Vec::new(),
                window_timeout_ms: 3000,
                poll_interval_ms: 50,
            },
            close: CloseConfig {
                settle_timeout_ms: 500,
            },
            dispatcher: DispatcherConfig { queue_capacity: 16 },
            parsed_hotkeys: None,
        };
        // Значения по умолчанию заведомо корректны
        config.parsed_hotkeys = config.parse_hotkeys().ok();
        config
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TILER_").split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        config.build_hotkeys()?;

        Ok(config)
    }

    /// Разбирает строки горячих клавиш и сохраняет результат
    pub fn build_hotkeys(&mut self) -> Result<()> {
        self.parsed_hotkeys = Some(self.parse_hotkeys()?);
        Ok(())
    }

    fn parse_hotkeys(&self) -> Result<(Hotkey, Hotkey)> {
        let open: Hotkey = self
            .hotkeys
            .open
            .parse()
            .map_err(|e: String| anyhow::anyhow!("hotkeys.open: {}", e))?;
        let close: Hotkey = self
            .hotkeys
            .close
            .parse()
            .map_err(|e: String| anyhow::anyhow!("hotkeys.close: {}", e))?;
        Ok((open, close))
    }

    pub fn open_hotkey(&self) -> Result<Hotkey> {
        match self.parsed_hotkeys {
            Some((open, _)) => Ok(open),
            None => Ok(self.parse_hotkeys()?.0),
        }
    }

    pub fn close_hotkey(&self) -> Result<Hotkey> {
        match self.parsed_hotkeys {
            Some((_, close)) => Ok(close),
            None => Ok(self.parse_hotkeys()?.1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.input.device_path.is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        // Валидация горячих клавиш
        let (open, close) = self.parse_hotkeys()?;
        if open == close {
            anyhow::bail!("Горячие клавиши open и close совпадают: {}", open);
        }
        if open.modifiers.is_empty() || close.modifiers.is_empty() {
            anyhow::bail!("Горячие клавиши должны содержать хотя бы один модификатор");
        }

        // Валидация запуска приложения
        if self.spawn.command.trim().is_empty() {
            anyhow::bail!("spawn.command не может быть пустым");
        }

        if self.spawn.window_timeout_ms == 0 {
            anyhow::bail!("spawn.window_timeout_ms должно быть больше 0");
        }

        if self.spawn.poll_interval_ms == 0 || self.spawn.poll_interval_ms >= self.spawn.window_timeout_ms {
            anyhow::bail!(
                "spawn.poll_interval_ms должно быть больше 0 и меньше window_timeout_ms ({})",
                self.spawn.window_timeout_ms
            );
        }

        if self.close.settle_timeout_ms == 0 {
            anyhow::bail!("close.settle_timeout_ms должно быть больше 0");
        }

        if self.dispatcher.queue_capacity == 0 {
            anyhow::bail!("dispatcher.queue_capacity должно быть больше 0");
        }

        Ok(())
    }

    /// Эффективная конфигурация в формате TOML (для --print-config)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Не удалось сериализовать конфигурацию")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyCode, Modifiers};
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.open_hotkey().unwrap().to_string(), "ctrl+alt+x");
        assert_eq!(config.close_hotkey().unwrap().to_string(), "ctrl+alt+c");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.spawn.poll_interval_ms = config.spawn.window_timeout_ms;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dispatcher.queue_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.spawn.command = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hotkey_validation() {
        let mut config = Config::default();
        config.hotkeys.close = "ctrl+alt+x".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hotkeys.open = "x".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hotkeys.open = "ctrl+alt+unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_merges_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[spawn]
command = "alacritty"
args = ["--class", "tiled"]

[hotkeys]
open = "super+enter"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.spawn.command, "alacritty");
        assert_eq!(config.spawn.args, vec!["--class", "tiled"]);
        // значения, которых нет в файле, берутся по умолчанию
        assert_eq!(config.spawn.window_timeout_ms, 3000);
        assert_eq!(config.hotkeys.close, "ctrl+alt+c");
        assert_eq!(
            config.open_hotkey().unwrap(),
            Hotkey::new(Modifiers::new().with_super(true), KeyCode::new(28))
        );
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dispatcher]\nqueue_capacity = 0").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let rendered = Config::default().to_toml().unwrap();

        assert!(rendered.contains("[spawn]"));
        assert!(rendered.contains("command = \"xterm\""));
        assert!(!rendered.contains("parsed_hotkeys"));
    }
}

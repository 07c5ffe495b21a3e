use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceSettings {
    /// Controller address; empty until configured or discovered.
    pub host: String,
    pub ws_port: u16,
    /// Port of the controller's read-only TCP service.
    pub tcp_port: u16,
    pub password: String,
    pub connect_timeout_secs: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            ws_port: 8214,
            tcp_port: crate::infrastructure::tcp::DEFAULT_PORT,
            password: String::new(),
            connect_timeout_secs: 10,
        }
    }
}

impl DeviceSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub sample_interval: i64,
    /// Column displayed after the first load when nothing else is.
    pub default_column: String,
    pub tick_format: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            sample_interval: crate::domain::reduction::DEFAULT_SAMPLE_INTERVAL,
            default_column: "TVL".to_string(),
            tick_format: "%H:%M %d.%m.%Y".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SessionSettings {
    /// Session file restored at startup and written by `save`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DiscoverySettings {
    pub ports: Vec<u16>,
    pub timeout_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            ports: vec![4444, 47808],
            timeout_ms: 1000,
        }
    }
}

impl DiscoverySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `config/dtaplot.toml` when present, overridden by `DTAPLOT__SECTION__KEY` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dtaplot").required(false))
        .add_source(config::Environment::with_prefix("DTAPLOT").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.device.ws_port, 8214);
        assert_eq!(settings.device.tcp_port, 8889);
        assert_eq!(settings.device.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.chart.sample_interval, 120);
        assert_eq!(settings.chart.default_column, "TVL");
        assert_eq!(settings.discovery.ports, vec![4444, 47808]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
            [device]
            host = "192.168.1.50"

            [chart]
            sample_interval = 60
        "#;
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.device.host, "192.168.1.50");
        assert_eq!(settings.device.ws_port, 8214);
        assert_eq!(settings.device.tcp_port, 8889);
        assert_eq!(settings.chart.sample_interval, 60);
        assert_eq!(settings.chart.tick_format, "%H:%M %d.%m.%Y");
        assert_eq!(settings.server.bind, "0.0.0.0:8080");
    }
}

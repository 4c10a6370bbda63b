use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::{
    bail,
    Error,
};
use serde::Deserialize;
use sieve::Window;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigData {
    /// Window used by `range` when no bounds are passed on the command line.
    #[serde(default)]
    pub window: Window,

    #[serde(default)]
    pub io: IoConfig,
}

#[derive(Debug)]
pub struct Config {
    pub config: ConfigData,
    pub path: Option<PathBuf>,
}

impl Config {
    pub const DIR_NAME: &'static str = "sieve";
    pub const CONFIG_FILE: &'static str = "sieve.toml";

    /// Opens the config file at `path`, or the one in the user's config
    /// directory if it exists. Without either, the defaults are used.
    pub fn open(path: Option<impl AsRef<Path>>) -> Result<Self, Error> {
        let path = match path {
            Some(path) => Some(path.as_ref().to_owned()),
            None => {
                dirs::config_local_dir()
                    .map(|path| path.join(Self::DIR_NAME).join(Self::CONFIG_FILE))
                    .filter(|path| path.exists())
            }
        };

        let config: ConfigData = if let Some(path) = &path {
            tracing::debug!(path = %path.display(), "reading config");
            let toml = std::fs::read_to_string(path)?;
            toml::from_str(&toml)?
        }
        else {
            ConfigData::default()
        };

        if config.io.chunk_size == 0 {
            bail!("io.chunk_size must not be 0");
        }

        Ok(Self { config, path })
    }
}

#[derive(Debug, Deserialize)]
pub struct IoConfig {
    /// Size of the buffer the input is copied through.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    8192
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use sieve::Window;

    use super::Config;

    fn config_file(toml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn it_reads_all_keys() {
        let file = config_file("[window]\nfrom = 6\nto = 10\n\n[io]\nchunk_size = 16\n");
        let config = Config::open(Some(file.path())).unwrap();
        assert_eq!(config.config.window, Window::new(6, 10).unwrap());
        assert_eq!(config.config.io.chunk_size, 16);
        assert_eq!(config.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let file = config_file("[window]\nto = 3\n");
        let config = Config::open(Some(file.path())).unwrap();
        assert_eq!(config.config.window, Window::new(0, 3).unwrap());
        assert_eq!(config.config.io.chunk_size, 8192);

        let file = config_file("");
        let config = Config::open(Some(file.path())).unwrap();
        assert_eq!(config.config.window, Window::ALL);
    }

    #[test]
    fn it_rejects_invalid_values() {
        let file = config_file("[io]\nchunk_size = 0\n");
        assert!(Config::open(Some(file.path())).is_err());

        let file = config_file("[window]\nfrom = 3\nto = 2\n");
        assert!(Config::open(Some(file.path())).is_err());
    }

    #[test]
    fn an_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::open(Some(dir.path().join("missing.toml"))).is_err());
    }
}

//! INI-file configuration source.
//!
//! Backtest settings live under `[backtest]` and data settings under
//! `[data]`. Parsing of typed values happens here so callers get a
//! config error naming the section and key instead of a bare parse
//! failure.

use std::path::Path;

use configparser::ini::Ini;

use crate::domain::error::FlowtraderError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file(path: &Path) -> Result<Self, FlowtraderError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(|e| FlowtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e,
        })?;
        Ok(FileConfigAdapter { ini })
    }

    pub fn from_string(contents: &str) -> Result<Self, FlowtraderError> {
        let mut ini = Ini::new();
        ini.read(contents.to_string())
            .map_err(|e| FlowtraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason: e,
            })?;
        Ok(FileConfigAdapter { ini })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Result<Option<String>, FlowtraderError> {
        Ok(self.ini.get(section, key))
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, FlowtraderError> {
        let Some(raw) = self.ini.get(section, key) else {
            return Ok(None);
        };
        raw.parse::<i64>()
            .map(Some)
            .map_err(|e| FlowtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{raw}' is not an integer: {e}"),
            })
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, FlowtraderError> {
        let Some(raw) = self.ini.get(section, key) else {
            return Ok(None);
        };
        raw.parse::<f64>()
            .map(Some)
            .map_err(|e| FlowtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{raw}' is not a number: {e}"),
            })
    }
}

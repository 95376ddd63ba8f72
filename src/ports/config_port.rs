//! Port for run configuration.

use chrono::NaiveDate;

use crate::domain::error::FlowtraderError;

/// Read-only access to configuration values, addressed by section and key.
/// Every getter returns `Ok(None)` for an absent key so callers can layer
/// defaults, and an error only when a present value cannot be parsed.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Result<Option<String>, FlowtraderError>;

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, FlowtraderError>;

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, FlowtraderError>;

    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, FlowtraderError> {
        let Some(raw) = self.get_string(section, key)? else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| FlowtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{raw}' is not a YYYY-MM-DD date: {e}"),
            })
    }
}

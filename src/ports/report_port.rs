//! Port for writing backtest reports.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::FlowtraderError;

pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        title: &str,
        path: &Path,
    ) -> Result<(), FlowtraderError>;
}

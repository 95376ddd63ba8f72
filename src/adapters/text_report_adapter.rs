//! Plain-text backtest report.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::FlowtraderError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        TextReportAdapter
    }

    pub fn render(&self, result: &BacktestResult, title: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.len()));
        let _ = writeln!(out);

        let m = &result.metrics;
        let _ = writeln!(out, "Total return:      {:.2} ({:.2}%)", m.total_return, m.total_return_pct);
        let _ = writeln!(out, "Annualized return: {:.2}%", m.annualized_return);
        let _ = writeln!(out, "Sharpe ratio:      {:.2}", m.sharpe_ratio);
        let _ = writeln!(out, "Max drawdown:      {:.2}%", m.max_drawdown);
        let _ = writeln!(out, "Win rate:          {:.2}%", m.win_rate);
        let _ = writeln!(out, "Profit factor:     {}", format_profit_factor(m.profit_factor));
        let _ = writeln!(out, "Trades:            {}", m.number_of_trades);

        if !result.trades.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Trade log");
            let _ = writeln!(out, "---------");
            for trade in &result.trades {
                let _ = writeln!(
                    out,
                    "{}  {:<4} {:<6} {:>8} @ {:>10.2}  value {:>12.2}  fee {:>6.2}",
                    trade.date,
                    format!("{:?}", trade.side).to_lowercase(),
                    trade.ticker,
                    trade.quantity,
                    trade.price,
                    trade.value,
                    trade.commission,
                );
            }
        }

        if !result.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Errors");
            let _ = writeln!(out, "------");
            for error in &result.errors {
                let _ = writeln!(out, "- {error}");
            }
        }

        out
    }
}

fn format_profit_factor(pf: f64) -> String {
    if pf.is_infinite() {
        "inf".to_string()
    } else {
        format!("{pf:.2}")
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        title: &str,
        path: &Path,
    ) -> Result<(), FlowtraderError> {
        let rendered = self.render(result, title);
        fs::write(path, rendered)?;
        Ok(())
    }
}

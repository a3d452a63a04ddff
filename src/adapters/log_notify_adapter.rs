//! Delivers the ticker list to the log and to stdout.

use crate::domain::error::NotifyError;
use crate::ports::notify_port::NotifyPort;
use chrono::NaiveDate;
use std::io::Write;

pub struct LogNotifyAdapter {
    recipients: Vec<String>,
}

impl LogNotifyAdapter {
    pub fn new(recipients: Vec<String>) -> Self {
        Self { recipients }
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// One ticker per line.
    pub fn write_tickers<W: Write>(out: &mut W, tickers: &[String]) -> Result<(), NotifyError> {
        for ticker in tickers {
            writeln!(out, "{ticker}")?;
        }
        Ok(())
    }
}

impl NotifyPort for LogNotifyAdapter {
    fn notify(&self, trading_day: NaiveDate, tickers: &[String]) -> Result<(), NotifyError> {
        if tickers.is_empty() {
            tracing::info!(%trading_day, "no eligible tickers");
            return Ok(());
        }
        tracing::info!(
            %trading_day,
            count = tickers.len(),
            tickers = %tickers.join(","),
            recipients = %self.recipients.join(","),
            "notifying"
        );
        let stdout = std::io::stdout();
        Self::write_tickers(&mut stdout.lock(), tickers)
    }
}

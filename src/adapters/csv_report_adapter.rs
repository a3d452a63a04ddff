//! CSV report adapter: the augmented table and the notification list.

use crate::domain::eligibility::Notifications;
use crate::domain::error::NotifyError;
use crate::domain::frame::{AugmentedBar, Column, Frame};
use crate::ports::report_port::ReportPort;
use std::path::Path;

const BAR_HEADERS: [&str; 10] = [
    "id",
    "code",
    "exchange_short_name",
    "date",
    "open",
    "high",
    "low",
    "close",
    "adjusted_close",
    "volume",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn bar_cells(row: &AugmentedBar) -> Vec<String> {
    let bar = &row.bar;
    vec![
        bar.id(),
        bar.code.clone(),
        bar.exchange.clone(),
        bar.date.format("%Y-%m-%d").to_string(),
        bar.open.to_string(),
        bar.high.to_string(),
        bar.low.to_string(),
        bar.close.to_string(),
        bar.adjusted_close.to_string(),
        bar.volume.to_string(),
    ]
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Cell text for a derived column. Undefined values are empty.
fn column_cell(row: &AugmentedBar, column: Column) -> String {
    match column {
        Column::Ema(span) => optional(row.ema(span)),
        Column::Rsi(length) => optional(row.rsi(length)),
        Column::AllTimeHigh => optional(row.all_time_high),
        Column::FlagEmaCross => row.flag_ema_cross.to_string(),
        Column::FlagEma200Band => optional(row.flag_ema200_band),
        Column::FlagRsiAbove50 => optional(row.flag_rsi_above_50),
        Column::FlagNotification => row.flag_notification.to_string(),
        Column::FlagNotificationDeduplicated => row.flag_notification_deduplicated.to_string(),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_frame(&self, frame: &Frame, output_path: &Path) -> Result<(), NotifyError> {
        let columns: Vec<Column> = frame.columns().iter().copied().collect();
        let mut wtr = csv::Writer::from_path(output_path)?;

        let mut header: Vec<String> = BAR_HEADERS.iter().map(|h| h.to_string()).collect();
        header.extend(columns.iter().map(Column::to_string));
        wtr.write_record(&header)?;

        for row in frame.rows() {
            let mut record = bar_cells(row);
            record.extend(columns.iter().map(|c| column_cell(row, *c)));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        tracing::info!(
            path = %output_path.display(),
            rows = frame.row_count(),
            "augmented table written"
        );
        Ok(())
    }

    fn write_notifications(
        &self,
        notifications: &Notifications,
        output_path: &Path,
    ) -> Result<(), NotifyError> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        wtr.write_record(BAR_HEADERS)?;
        for row in &notifications.rows {
            wtr.write_record(bar_cells(row))?;
        }
        wtr.flush()?;

        tracing::info!(
            path = %output_path.display(),
            rows = notifications.rows.len(),
            "notification list written"
        );
        Ok(())
    }
}

//! Output port for the augmented table and the final notification list.

use crate::domain::eligibility::Notifications;
use crate::domain::error::NotifyError;
use crate::domain::frame::Frame;
use std::path::Path;

pub trait ReportPort {
    /// Write the fully augmented table, one row per bar, for charting.
    fn write_frame(&self, frame: &Frame, output_path: &Path) -> Result<(), NotifyError>;

    fn write_notifications(
        &self,
        notifications: &Notifications,
        output_path: &Path,
    ) -> Result<(), NotifyError>;
}

//! Batch report output

pub mod report;

pub use report::{
    console_summary, render_csv_log, render_text_log, LogFormat, ReportFiles, ReportWriter,
};

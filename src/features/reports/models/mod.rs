mod report;

pub use report::{Report, ReportAuthor, ReportKind, VictimRef};

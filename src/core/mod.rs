mod finding;
mod report;
mod resource;

pub use finding::{AssessmentResult, Finding};
pub use report::{Report, ReportSummary};
pub use resource::{CloudSpecific, Resource};

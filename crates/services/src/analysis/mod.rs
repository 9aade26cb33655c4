mod demo;
mod request;
mod service;

pub use demo::{DEMO_ANALYSIS_ID, demo_analysis};
pub use request::AnalysisRequest;
pub use service::{Analysis, AnalysisOrigin, AnalysisService};

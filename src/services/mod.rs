pub mod extraction_service;
pub mod grading_service;

pub use extraction_service::ExtractionService;
pub use grading_service::GradingService;

pub mod credentials;
pub mod fingerprint;
pub mod image;
pub mod loaders;
pub mod report;
pub mod rubric;

pub use credentials::Credentials;
pub use fingerprint::Fingerprint;
pub use image::{ImageSource, QuizImage, DEFAULT_MEDIA_TYPE};
pub use loaders::{load_image_file, load_images_from_dir, load_job, GradingJob};
pub use report::{
    join_pages, ExtractionResult, GradingReport, PipelineOutput, ScoreSummary, ERROR_PREFIX,
    PAGE_BREAK,
};
pub use rubric::{RubricMode, RubricSource};

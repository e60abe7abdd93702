pub mod job_loader;

pub use job_loader::{load_image_file, load_images_from_dir, load_job, GradingJob, JobRubric};

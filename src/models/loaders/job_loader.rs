use crate::error::{AppError, AppResult, FileError};
use crate::models::image::{ImageSource, QuizImage};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 可识别的图片扩展名
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 批改任务文件
///
/// ```toml
/// pages = ["page1.jpg", "page2.jpg"]
///
/// [rubric]
/// text = "Q1. 42 (3 points)"
/// # 或 image = "rubric.png"
/// ```
///
/// 相对路径以任务文件所在目录为基准。
#[derive(Debug, Clone, Deserialize)]
pub struct GradingJob {
    #[serde(default)]
    pub pages: Vec<PathBuf>,
    #[serde(default)]
    pub rubric: JobRubric,
}

/// 任务文件中的评分标准，`text` 与 `image` 至多设置一个
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRubric {
    pub text: Option<String>,
    pub image: Option<PathBuf>,
}

/// 加载批改任务文件
pub async fn load_job(job_file_path: &Path) -> AppResult<GradingJob> {
    let content = fs::read_to_string(job_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(job_file_path.display().to_string(), e))?;

    let mut job: GradingJob = toml::from_str(&content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: job_file_path.display().to_string(),
            source: e,
        })
    })?;

    if job.rubric.text.is_some() && job.rubric.image.is_some() {
        return Err(AppError::File(FileError::InvalidJob {
            path: job_file_path.display().to_string(),
            reason: "[rubric] 不能同时设置 text 与 image".to_string(),
        }));
    }

    // 相对路径转换为相对任务文件
    let base = job_file_path.parent().unwrap_or_else(|| Path::new("."));
    job.pages = job.pages.iter().map(|p| base.join(p)).collect();
    job.rubric.image = job.rubric.image.map(|p| base.join(p));

    tracing::info!(
        "成功加载任务文件 {}: {} 页",
        job_file_path.display(),
        job.pages.len()
    );

    Ok(job)
}

/// 读取单张图片
pub async fn load_image_file(path: &Path, source: ImageSource) -> AppResult<QuizImage> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(AppError::File(FileError::NotFound {
            path: path.display().to_string(),
        }));
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(QuizImage::new(bytes, source).with_name(name))
}

/// 读取文件夹中的所有图片，按文件名排序
pub async fn load_images_from_dir(folder_path: &Path) -> AppResult<Vec<QuizImage>> {
    if !fs::try_exists(folder_path).await.unwrap_or(false) {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.display().to_string(),
        }));
    }

    let mut entries = fs::read_dir(folder_path)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path.display().to_string(), e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path.display().to_string(), e))?
    {
        let path = entry.path();
        if is_image_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    // 任意一张读取失败都中止，避免页码错位
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        images.push(load_image_file(path, ImageSource::Upload).await?);
    }

    tracing::info!("在 {} 中找到 {} 张图片", folder_path.display(), images.len());

    Ok(images)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_job_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "pages = [\"p1.jpg\", \"p2.png\"]\n\n[rubric]\nimage = \"rubric.png\"\n",
        )
        .unwrap();

        let job = load_job(&job_path).await.unwrap();

        assert_eq!(job.pages, vec![dir.path().join("p1.jpg"), dir.path().join("p2.png")]);
        assert_eq!(job.rubric.image, Some(dir.path().join("rubric.png")));
        assert!(job.rubric.text.is_none());
    }

    #[tokio::test]
    async fn test_invalid_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(&job_path, "pages = 3").unwrap();

        let err = load_job(&job_path).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::TomlParseFailed { .. })));
    }

    #[tokio::test]
    async fn test_job_with_both_rubric_fields_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "pages = [\"p1.jpg\"]\n\n[rubric]\ntext = \"Q1\"\nimage = \"r.png\"\n",
        )
        .unwrap();

        let err = load_job(&job_path).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::InvalidJob { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_page_in_dir_aborts_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"first").unwrap();
        // 名为 b.jpg 的目录无法按文件读取
        std::fs::create_dir(dir.path().join("b.jpg")).unwrap();

        let err = load_images_from_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[tokio::test]
    async fn test_load_images_from_dir_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.JPG"), b"second").unwrap();
        std::fs::write(dir.path().join("a.png"), b"first").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let images = load_images_from_dir(dir.path()).await.unwrap();

        let names: Vec<_> = images.iter().filter_map(|i| i.name()).collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }

    #[tokio::test]
    async fn test_missing_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image_file(&dir.path().join("nope.jpg"), ImageSource::Upload)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }
}

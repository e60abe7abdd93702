use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 图片集合操作错误
    #[error("图片集合错误: {0}")]
    Collection(#[from] CollectionError),
    /// 评分标准错误
    #[error("评分标准错误: {0}")]
    Rubric(#[from] RubricError),
    /// 批改流程被拒绝
    #[error("批改流程被拒绝: {0}")]
    Rejected(#[from] RejectReason),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 图片集合错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// 索引超出范围
    #[error("索引 {index} 超出范围 (共 {len} 张图片)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 评分标准错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RubricError {
    /// 文本模式下评分标准为空
    #[error("评分标准文本为空")]
    EmptyRubric,
    /// 图片模式下没有上传评分标准图片
    #[error("未上传评分标准图片")]
    MissingRubricImage,
    /// 评分标准图片识别失败
    #[error("评分标准图片识别失败: {cause}")]
    RubricExtractionFailed { cause: String },
}

/// 批改流程拒绝原因
///
/// 校验类错误发生在任何外部调用之前；`RubricResolutionFailed` 发生在评分标准解析阶段，
/// 会终止整个流程。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// 没有试卷图片
    #[error("请至少上传一张试卷图片")]
    NoImages,
    /// 缺少 API 密钥
    #[error("请同时提供 OCR 与批改两个 API 密钥")]
    MissingCredentials,
    /// 评分标准无效
    #[error("评分标准无效: {0}")]
    InvalidRubric(RubricError),
    /// 图片数量超过上限
    #[error("图片数量 {count} 超过上限 {max}")]
    TooManyPages { count: usize, max: usize },
    /// 单张图片过大
    #[error("第 {page} 页图片大小 {size} 字节超过上限 {max} 字节")]
    ImageTooLarge { page: usize, size: usize, max: usize },
    /// 评分标准图片过大
    #[error("评分标准图片大小 {size} 字节超过上限 {max} 字节")]
    RubricImageTooLarge { size: usize, max: usize },
    /// 评分标准解析失败（致命）
    #[error("评分标准解析失败: {0}")]
    RubricResolutionFailed(RubricError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 任务文件内容无效
    #[error("任务文件无效 ({path}): {reason}")]
    InvalidJob { path: String, reason: String },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 配置项取值无效
    #[error("配置项 {name} 取值无效: {value}")]
    InvalidValue { name: String, value: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建配置项无效错误
    pub fn invalid_config(name: impl Into<String>, value: impl ToString) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            name: name.into(),
            value: value.to_string(),
        })
    }

    /// 如果是流程拒绝错误，返回拒绝原因
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            AppError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批改流程的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `pipeline` - 批改流程状态机
//! - 校验输入（图片、密钥、评分标准、数量与大小上限）
//! - 解析评分标准（图片模式下先识别）
//! - 委托 batch_extractor 识别所有页面
//! - 拼接识别文本并调用批改
//!
//! ### `batch_extractor` - 批量识别器
//! - 控制并发数量（Semaphore）
//! - 保证结果顺序与页序一致
//! - 汇报进度
//!
//! ## 层次关系
//!
//! ```text
//! session::GradingSession (持有会话状态)
//!     ↓
//! pipeline (校验 → 评分标准 → 识别 → 批改)
//!     ↓
//! batch_extractor (处理 Vec<QuizImage>)
//!     ↓
//! workflow::PageFlow (处理单页)
//!     ↓
//! services (能力层：识别 / 批改)
//!     ↓
//! clients (外部模型)
//! ```

pub mod batch_extractor;
pub mod pipeline;

/// 进度回调：(已完成页数, 总页数)
pub type ProgressFn<'a> = dyn FnMut(usize, usize) + Send + 'a;

// 重新导出主要类型
pub use batch_extractor::BatchExtractor;
pub use pipeline::{PipelineOrchestrator, PipelineStage};

use crate::models::{GradingReport, RubricSource};
use crate::session::image_collection::ImageCollection;

/// 单个批改会话的全部状态
#[derive(Debug, Default)]
pub struct SessionState {
    pub images: ImageCollection,
    pub rubric: RubricSource,
    /// 最近一次批改的识别文本汇总
    pub extracted_text: String,
    /// 最近一次批改报告
    pub grading_report: Option<GradingReport>,
    /// 拍摄输入框的编号，每接受一张拍摄后递增；重置时保留
    capture_slot: u64,
    /// 批改完成标记，只能被消费一次
    processing_complete: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture_slot(&self) -> u64 {
        self.capture_slot
    }

    /// 递增拍摄编号并返回新值
    pub(crate) fn advance_capture_slot(&mut self) -> u64 {
        self.capture_slot += 1;
        self.capture_slot
    }

    pub(crate) fn mark_complete(&mut self) {
        self.processing_complete = true;
    }

    /// 取出批改完成信号；返回 `true` 后标记被清除
    pub fn take_completion_signal(&mut self) -> bool {
        std::mem::take(&mut self.processing_complete)
    }

    /// 清空会话，拍摄编号除外
    pub fn reset(&mut self) {
        let capture_slot = self.capture_slot;
        *self = Self {
            capture_slot,
            ..Self::default()
        };
    }
}

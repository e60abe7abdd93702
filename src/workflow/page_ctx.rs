//! 页处理上下文
//!
//! 封装"我正在处理第几页"这一信息

use std::fmt::Display;

use crate::models::Fingerprint;

/// 页处理上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 页在集合中的位置（从1开始）
    pub page_number: usize,

    /// 本次批改的总页数
    pub total_pages: usize,

    /// 图片指纹
    pub fingerprint: Fingerprint,
}

impl PageCtx {
    pub fn new(page_number: usize, total_pages: usize, fingerprint: Fingerprint) -> Self {
        Self {
            page_number,
            total_pages,
            fingerprint,
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[页 {}/{} #{}]",
            self.page_number,
            self.total_pages,
            self.fingerprint.short()
        )
    }
}

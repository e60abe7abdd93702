//! 去重后的有序图片集合
//!
//! 顺序序列与指纹集合同步维护：序列保证首次出现的先后顺序，集合保证 O(1) 去重判断。

use std::collections::HashSet;

use crate::error::CollectionError;
use crate::models::{Fingerprint, QuizImage};

#[derive(Debug, Default, Clone)]
pub struct ImageCollection {
    images: Vec<QuizImage>,
    fingerprints: HashSet<Fingerprint>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加图片；指纹已存在时不做任何事
    ///
    /// 返回是否真正加入了集合。
    pub fn add(&mut self, image: QuizImage) -> bool {
        if !self.fingerprints.insert(image.fingerprint()) {
            return false;
        }
        self.images.push(image);
        true
    }

    /// 删除指定位置的图片，之后的图片索引前移一位
    pub fn remove_at(&mut self, index: usize) -> Result<QuizImage, CollectionError> {
        if index >= self.images.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        let image = self.images.remove(index);
        self.fingerprints.remove(&image.fingerprint());
        Ok(image)
    }

    pub fn at(&self, index: usize) -> Option<&QuizImage> {
        self.images.get(index)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.fingerprints.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizImage> {
        self.images.iter()
    }
}

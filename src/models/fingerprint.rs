//! 图片内容指纹
//!
//! 对图片原始字节计算 SHA-256，作为去重身份。
//! 必须基于原始字节，而不是重新编码后的数据，这样无论文件名或拍摄时间如何，
//! 字节相同的图片总会被识别为重复。

use sha2::{Digest, Sha256};
use std::fmt;

/// 图片内容指纹（SHA-256）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// 计算字节内容的指纹
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// 指纹前 12 位十六进制，用于日志显示
    pub fn short(&self) -> String {
        self.to_string().chars().take(12).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(Fingerprint::of(b"page one"), Fingerprint::of(b"page one"));
        assert_ne!(Fingerprint::of(b"page one"), Fingerprint::of(b"page two"));
    }

    #[test]
    fn test_fingerprint_hex_matches_sha256() {
        let expected = format!("{:x}", Sha256::digest(b"test content"));
        let fingerprint = Fingerprint::of(b"test content");

        assert_eq!(fingerprint.to_string(), expected);
        assert_eq!(fingerprint.short(), &expected[..12]);
    }
}

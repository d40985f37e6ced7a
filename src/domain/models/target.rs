// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.-]").expect("Failed to compile cleaning regex"));

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("Failed to compile hostname regex")
});

/// 输入行被拒绝的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainRejection {
    #[error("blank line")]
    Blank,

    #[error("Skipping domain after cleaning resulted in empty string.")]
    EmptyAfterCleaning,

    #[error("Skipping invalid domain format: {0}")]
    InvalidFormat(String),
}

/// 移除域名行中所有非 `[A-Za-z0-9.-]` 字符
pub fn clean(raw: &str) -> String {
    DISALLOWED_CHARS.replace_all(raw, "").trim().to_string()
}

/// 检查字符串是否为语法合法的主机名
pub fn is_valid(domain: &str) -> bool {
    HOSTNAME.is_match(domain)
}

/// 已清洗并验证的目标域名
///
/// 只能通过 [`Domain::parse`] 创建，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// 从原始输入行解析域名
    ///
    /// # 参数
    ///
    /// * `line` - 原始输入行
    ///
    /// # 返回值
    ///
    /// * `Ok(Domain)` - 清洗并验证通过的域名
    /// * `Err(DomainRejection)` - 该行应被跳过的原因
    pub fn parse(line: &str) -> Result<Self, DomainRejection> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(DomainRejection::Blank);
        }

        let cleaned = clean(trimmed);
        if cleaned.is_empty() {
            return Err(DomainRejection::EmptyAfterCleaning);
        }

        if !is_valid(&cleaned) {
            return Err(DomainRejection::InvalidFormat(cleaned));
        }

        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::sources::source::ApiKeys;
use crate::infrastructure::sources::factory::SourceKeys;
use crate::utils::errors::HarvestError;
use crate::utils::retry_policy::RetryPolicy;
use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::BaseDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// 配置目录名称
pub const CONFIG_DIR_NAME: &str = "Ph.Sh_url";
/// 配置文件名称
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// 应用程序配置设置
///
/// 三个数据源各自的 API 密钥列表（均可为空）以及扫描节奏参数
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// VirusTotal API 密钥
    #[serde(default, deserialize_with = "null_as_empty")]
    pub virustotal: Vec<String>,
    /// AlienVault OTX API 密钥
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alienvault: Vec<String>,
    /// HudsonRock API 密钥
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hudsonrock: Vec<String>,
    /// 扫描节奏配置
    pub scan: ScanSettings,
}

/// A key section left with no entries parses as null; treat it as an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 扫描节奏配置设置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScanSettings {
    /// 两个域名之间的等待时间（秒）
    pub domain_delay_secs: u64,
    /// 每个请求的最大尝试次数
    pub retry_attempts: u32,
    /// 重试间隔（秒）
    pub retry_delay_secs: u64,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            domain_delay_secs: 20,
            retry_attempts: 3,
            retry_delay_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Layout of the file written on first run.
#[derive(Debug, Serialize)]
struct DefaultConfigFile {
    virustotal: Vec<String>,
    alienvault: Vec<String>,
    hudsonrock: Vec<String>,
    scan: ScanSettings,
}

impl Settings {
    /// 默认配置文件路径：`~/.config/Ph.Sh_url/config.yaml`
    pub fn default_path() -> Result<PathBuf, HarvestError> {
        let dirs = BaseDirs::new().ok_or(HarvestError::HomeDirUnavailable)?;
        Ok(dirs
            .home_dir()
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// 加载配置
    ///
    /// 文件不存在时写入带占位密钥的默认配置，并返回错误提示用户编辑
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(HarvestError)` - 配置缺失、无法读取或无法解析
    pub fn load(path: &Path) -> Result<Self, HarvestError> {
        if !path.exists() {
            write_default_config(path).map_err(|source| HarvestError::ConfigBootstrap {
                path: path.to_path_buf(),
                source,
            })?;
            return Err(HarvestError::ConfigCreated(path.to_path_buf()));
        }

        info!("Loading configuration from {}", path.display());
        Ok(Self::from_file(path)?)
    }

    /// 从指定 YAML 文件构建配置，环境变量 `PHSH__SCAN__*` 可覆盖扫描参数
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let defaults = ScanSettings::default();
        let builder = Config::builder()
            .set_default("scan.domain_delay_secs", defaults.domain_delay_secs)?
            .set_default("scan.retry_attempts", defaults.retry_attempts)?
            .set_default("scan.retry_delay_secs", defaults.retry_delay_secs)?
            .set_default("scan.request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::from(path).format(FileFormat::Yaml).required(true))
            .add_source(Environment::with_prefix("PHSH").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn source_keys(&self) -> SourceKeys {
        SourceKeys {
            virustotal: ApiKeys::new(self.virustotal.clone()),
            alienvault: ApiKeys::new(self.alienvault.clone()),
            hudsonrock: ApiKeys::new(self.hudsonrock.clone()),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.scan.retry_attempts,
            Duration::from_secs(self.scan.retry_delay_secs),
        )
    }

    pub fn domain_delay(&self) -> Duration {
        Duration::from_secs(self.scan.domain_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scan.request_timeout_secs)
    }
}

/// 写入默认配置文件（必要时创建目录）
pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let template = DefaultConfigFile {
        virustotal: vec!["YOUR_VT_API_KEY_1".to_string()],
        alienvault: vec!["YOUR_OTX_API_KEY_1".to_string()],
        hudsonrock: vec!["YOUR_HUDSONROCK_API_KEY_1".to_string()],
        scan: ScanSettings::default(),
    };
    let body = serde_yaml::to_string(&template)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    std::fs::write(path, format!("# Configuration file for Ph.Sh_URL\n{}", body))
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

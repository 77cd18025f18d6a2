//! YAML configuration: the source lists and the webhook.
//!
//! ```yaml
//! sources:
//!   cloud_websites:
//!     - name: Alibaba Cloud Database Blog
//!       url: https://www.alibabacloud.com/blog/database
//!   expert_blogs:
//!     - name: Planet PostgreSQL
//!       url: https://planet.postgresql.org/rss20.xml
//!       type: rss
//! wechat:
//!   webhook_url: https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=...
//! ```
//!
//! Cloud websites are always scraped as HTML. A blog is read as a feed when
//! its `type` is `rss` and scraped as HTML otherwise.

use crate::error::ConfigError;
use crate::models::{SourceDescriptor, SourceGroup, SourceKind};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub wechat: Option<WebhookConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub cloud_websites: Vec<SiteEntry>,
    #[serde(default)]
    pub expert_blogs: Vec<BlogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SiteEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct BlogEntry {
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookConfig {
    pub webhook_url: Option<String>,
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(&yaml)?;
        info!(
            cloud_websites = config.sources.cloud_websites.len(),
            expert_blogs = config.sources.expert_blogs.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validated descriptors for every source, cloud websites first.
    pub fn source_descriptors(&self) -> Result<Vec<SourceDescriptor>, ConfigError> {
        let cloud = self.sources.cloud_websites.iter().enumerate().map(|(i, s)| {
            descriptor(
                "cloud_websites",
                i,
                &s.name,
                &s.url,
                SourceKind::Html,
                SourceGroup::CloudWebsite,
            )
        });
        let blogs = self.sources.expert_blogs.iter().enumerate().map(|(i, b)| {
            let kind = match b.kind.as_deref() {
                Some(k) if k.eq_ignore_ascii_case("rss") => SourceKind::Rss,
                _ => SourceKind::Html,
            };
            descriptor("expert_blogs", i, &b.name, &b.url, kind, SourceGroup::ExpertBlog)
        });
        cloud.chain(blogs).collect()
    }

    /// The webhook URL, preferring `override_url` over the file.
    pub fn webhook_url(&self, override_url: Option<&str>) -> Result<String, ConfigError> {
        let url = override_url
            .or_else(|| self.wechat.as_ref().and_then(|w| w.webhook_url.as_deref()))
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingWebhook)?;
        Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            name: "webhook".to_string(),
            url: url.to_string(),
            source,
        })?;
        Ok(url.to_string())
    }
}

fn descriptor(
    collection: &'static str,
    index: usize,
    name: &str,
    url: &str,
    kind: SourceKind,
    group: SourceGroup,
) -> Result<SourceDescriptor, ConfigError> {
    let empty = |field| ConfigError::EmptyField {
        collection,
        index,
        field,
    };
    let name = name.trim();
    let url = url.trim();
    if name.is_empty() {
        return Err(empty("name"));
    }
    if url.is_empty() {
        return Err(empty("url"));
    }
    Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
        name: name.to_string(),
        url: url.to_string(),
        source,
    })?;
    Ok(SourceDescriptor::new(name, url, kind, group))
}

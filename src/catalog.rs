//! Remote package catalog lookups.

use crate::error::{ConfigError, StageError};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

pub const PACKAGE_NAME_PLACEHOLDER: &str = "{packageName}";

/// Answers whether a package exists upstream.
pub trait PackageCatalog {
    fn exists(&self, name: &str) -> Result<(), StageError>;
}

/// The fields of a catalog response this crate cares about.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PackageInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// HTTP catalog driven by a URL template containing `{packageName}`.
pub struct RepoCatalog {
    template: Option<String>,
    client: Client,
}

impl RepoCatalog {
    pub fn new(template: Option<&str>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("pkgstage/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            template: template
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            client,
        }
    }

    /// Validate the configured template. `None` means no catalog is set up.
    pub fn template(&self) -> Result<Option<&str>, ConfigError> {
        let Some(template) = self.template.as_deref() else {
            return Ok(None);
        };

        Url::parse(template).map_err(|err| ConfigError::InvalidCatalogUrl {
            url: template.to_string(),
            reason: err.to_string(),
        })?;

        if !template.contains(PACKAGE_NAME_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                url: template.to_string(),
            });
        }

        Ok(Some(template))
    }

    pub fn package_url(template: &str, name: &str) -> String {
        template.replacen(PACKAGE_NAME_PLACEHOLDER, &urlencoding::encode(name), 1)
    }

    /// Fetch catalog metadata for a package. Unlike [`exists`], this needs a
    /// configured catalog.
    ///
    /// [`exists`]: PackageCatalog::exists
    pub fn package_info(&self, name: &str) -> Result<PackageInfo, StageError> {
        let template = self.template()?.ok_or(ConfigError::NoCatalog)?;
        let url = Self::package_url(template, name);
        tracing::debug!(%url, "fetching package information");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| StageError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StageError::PackageNotFound {
                name: name.to_string(),
            });
        }

        response
            .json::<PackageInfo>()
            .map_err(|err| StageError::Parse(err.to_string()))
    }
}

impl PackageCatalog for RepoCatalog {
    fn exists(&self, name: &str) -> Result<(), StageError> {
        let Some(template) = self.template()? else {
            tracing::warn!(
                package = name,
                "no catalog url set, not checking whether the package exists"
            );
            return Ok(());
        };

        let url = Self::package_url(template, name);
        tracing::debug!(%url, "checking if package exists in repo");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| StageError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(package = name, status = %response.status(), "package not in repo");
            return Err(StageError::PackageNotFound {
                name: name.to_string(),
            });
        }

        Ok(())
    }
}

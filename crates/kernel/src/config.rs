//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};

use crate::pagination::{DEFAULT_SORT_FIELD, SortDirection};

/// Listing query defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Page used when the request has none or an invalid one (default: 1).
    pub default_page: u32,

    /// Items per page when the request does not ask for a size (default: 10).
    pub page_size: u32,

    /// Upper bound for request-supplied page sizes (default: 100).
    pub max_page_size: u32,

    /// Sort field when the request has none (default: createdAt).
    pub sort_field: String,

    /// Sort order paired with `sort_field` (default: desc).
    pub sort_order: SortDirection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page: 1,
            page_size: 10,
            max_page_size: 100,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortDirection::Desc,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_page = lookup("PASAR_DEFAULT_PAGE")
            .map(|v| v.trim().parse::<u32>())
            .transpose()
            .context("PASAR_DEFAULT_PAGE must be a valid u32")?
            .unwrap_or(defaults.default_page);

        let page_size = lookup("PASAR_PAGE_SIZE")
            .map(|v| v.trim().parse::<u32>())
            .transpose()
            .context("PASAR_PAGE_SIZE must be a valid u32")?
            .unwrap_or(defaults.page_size);

        let max_page_size = lookup("PASAR_MAX_PAGE_SIZE")
            .map(|v| v.trim().parse::<u32>())
            .transpose()
            .context("PASAR_MAX_PAGE_SIZE must be a valid u32")?
            .unwrap_or(defaults.max_page_size);

        let sort_field = lookup("PASAR_SORT_FIELD")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.sort_field);

        let sort_order = match lookup("PASAR_SORT_ORDER") {
            Some(raw) => SortDirection::parse(&raw)
                .with_context(|| format!("PASAR_SORT_ORDER must be asc or desc, got '{raw}'"))?,
            None => defaults.sort_order,
        };

        if default_page == 0 {
            bail!("PASAR_DEFAULT_PAGE must be at least 1");
        }
        if page_size == 0 || page_size > max_page_size {
            bail!("PASAR_PAGE_SIZE must be between 1 and PASAR_MAX_PAGE_SIZE ({max_page_size})");
        }

        Ok(Self {
            default_page,
            page_size,
            max_page_size,
            sort_field,
            sort_order,
        })
    }

    /// Bound a request-supplied page size to `1..=max_page_size`, falling
    /// back to `page_size` when none was given.
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|n| *n > 0)
            .map_or(self.page_size, |n| n.min(self.max_page_size))
    }
}

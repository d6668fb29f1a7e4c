use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::layout::PageGeometry;

/// Whether a preview must carry both a name and an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPolicy {
    /// Missing contact fields default to empty strings.
    Permissive,
    /// Requests whose normalized name or email is empty are rejected.
    Require,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the built single-page app (`index.html` + assets).
    pub static_dir: PathBuf,
    pub json_body_limit: usize,
    pub contact_policy: ContactPolicy,
    pub page_geometry: PageGeometry,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "10000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let json_body_limit = lookup("JSON_BODY_LIMIT")
            .unwrap_or_else(|| (1024 * 1024).to_string())
            .parse::<usize>()
            .context("JSON_BODY_LIMIT must be a byte count")?;

        let contact_policy = match lookup("CONTACT_POLICY").as_deref().unwrap_or("permissive") {
            "permissive" => ContactPolicy::Permissive,
            "require" => ContactPolicy::Require,
            other => bail!("CONTACT_POLICY must be 'permissive' or 'require', got '{other}'"),
        };

        let margin = lookup("PAGE_MARGIN")
            .unwrap_or_else(|| "40".to_string())
            .parse::<f32>()
            .context("PAGE_MARGIN must be a number of points")?;

        let page_geometry = match lookup("PAGE_SIZE").as_deref().unwrap_or("a4") {
            "a4" => PageGeometry::a4(margin),
            "letter" => PageGeometry::letter(margin),
            other => bail!("PAGE_SIZE must be 'a4' or 'letter', got '{other}'"),
        }
        .context("PAGE_MARGIN does not fit the page size")?;

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("frontend/build")),
            json_body_limit,
            contact_policy,
            page_geometry,
        })
    }

    /// Fallback `EnvFilter` directives: this crate and the HTTP trace layer,
    /// both at the configured level.
    pub fn log_filter(&self) -> String {
        format!(
            "{crate_name}={level},tower_http={level}",
            crate_name = env!("CARGO_PKG_NAME").replace('-', "_"),
            level = self.rust_log
        )
    }
}

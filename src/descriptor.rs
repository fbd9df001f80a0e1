//! The application descriptor rendered by the chat client.
//!
//! A descriptor is assembled once at startup by concatenating the backend
//! and examples base URLs with [`APP_SLUG`]. Construction never fails and
//! never inspects its inputs; [`ApplicationDescriptor::validate`] is the
//! startup check that turns bad configuration into a [`ConfigError`].

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use url::Url;

use crate::config::Settings;
use crate::constants::{
    APP_NAME, APP_SLUG, ASSISTANT_NAME, AVATAR_URL, BACKGROUND_IMAGE_URL, EXAMPLE_PROMPTS,
    PLACEHOLDER_TEXT, WELCOME_MESSAGE,
};
use crate::error::{ConfigError, Result};
use crate::secret::Secret;

/// Immutable description of one chat application.
///
/// Fields are private and there are no setters. Serialized keys use the
/// camelCase names the client reads; `apiKey` serializes masked.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    api_url: String,
    api_key: Secret,
    app_name: String,
    assistant_name: String,
    avatar_url: String,
    background_image_url: String,
    welcome_message: String,
    example_prompts: Vec<String>,
    placeholder_text: String,
    info_url: String,
}

impl ApplicationDescriptor {
    /// Build the descriptor from the three external strings.
    ///
    /// URLs are `base + slug` with no separator inserted, so a base without
    /// a trailing `/` yields e.g. `https://api.example.comdefault-...`.
    pub fn new(
        backend_api_base_url: &str,
        api_gateway_key: impl Into<Secret>,
        openai_examples_base_url: &str,
    ) -> Self {
        ApplicationDescriptor {
            api_url: format!("{}{}", backend_api_base_url, APP_SLUG),
            api_key: api_gateway_key.into(),
            app_name: APP_NAME.to_string(),
            assistant_name: ASSISTANT_NAME.to_string(),
            avatar_url: AVATAR_URL.to_string(),
            background_image_url: BACKGROUND_IMAGE_URL.to_string(),
            welcome_message: WELCOME_MESSAGE.to_string(),
            example_prompts: EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect(),
            placeholder_text: PLACEHOLDER_TEXT.to_string(),
            info_url: format!("{}{}", openai_examples_base_url, APP_SLUG),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let descriptor = ApplicationDescriptor::new(
            settings.backend_api_url(),
            settings.aws_api_gateway_key().clone(),
            settings.openai_examples_url(),
        );
        tracing::debug!(
            slug = APP_SLUG,
            api_url = %descriptor.api_url,
            info_url = %descriptor.info_url,
            "Built application descriptor"
        );
        descriptor
    }

    pub fn slug(&self) -> &'static str {
        APP_SLUG
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> &Secret {
        &self.api_key
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn background_image_url(&self) -> &str {
        &self.background_image_url
    }

    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }

    /// Example prompts in display order
    pub fn example_prompts(&self) -> &[String] {
        &self.example_prompts
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder_text
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    pub fn avatar_path(&self, asset_root: &Path) -> PathBuf {
        resolve_asset(asset_root, &self.avatar_url)
    }

    pub fn background_image_path(&self, asset_root: &Path) -> PathBuf {
        resolve_asset(asset_root, &self.background_image_url)
    }

    /// Startup check. Reports the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing { field: "apiKey" });
        }
        require_text("appName", &self.app_name)?;
        require_text("assistantName", &self.assistant_name)?;
        require_url("apiUrl", &self.api_url)?;
        require_url("infoUrl", &self.info_url)?;
        require_asset_path("avatarUrl", &self.avatar_url)?;
        require_asset_path("backgroundImageUrl", &self.background_image_url)?;
        Ok(())
    }

    /// JSON rendering, optionally with the real API key
    pub fn to_json_value(&self, reveal_key: bool) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if reveal_key {
            value["apiKey"] = serde_json::Value::String(self.api_key.expose().to_string());
        }
        Ok(value)
    }
}

/// Join a relative asset path onto the static asset root
pub fn resolve_asset(asset_root: &Path, path: &str) -> PathBuf {
    asset_root.join(path)
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing { field });
    }
    Ok(())
}

/// Valid URL whose last path segment is the slug
fn require_url(field: &'static str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })?;
    let last_segment = url.path_segments().and_then(|mut segments| segments.next_back());
    if last_segment != Some(APP_SLUG) || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::SlugNotInPath {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn require_asset_path(field: &'static str, value: &str) -> Result<()> {
    let path = Path::new(value);
    let escapes = value.is_empty()
        || value.contains("://")
        || path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::InvalidAssetPath {
            field,
            path: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com/";
    const EXAMPLES: &str = "https://examples.example.com/";

    #[test]
    fn test_urls_are_plain_concatenation() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        assert_eq!(d.api_url(), "https://api.example.com/default-single-page-websit");
        assert_eq!(d.info_url(), "https://examples.example.com/default-single-page-websit");
        assert_eq!(d.api_key().expose(), "K123");

        let no_slash = ApplicationDescriptor::new("https://api.example.com", "K", EXAMPLES);
        assert_eq!(no_slash.api_url(), format!("https://api.example.com{}", APP_SLUG));
    }

    #[test]
    fn test_example_prompts_keep_order() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        let prompts: Vec<&str> = d.example_prompts().iter().map(String::as_str).collect();
        assert_eq!(
            prompts,
            vec![
                "\"make a hello world app\"",
                "\"make a todo list app\"",
                "\"make a recipe app\"",
            ]
        );
    }

    #[test]
    fn test_copies_do_not_alias() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        let mut prompts = d.example_prompts().to_vec();
        prompts.push("\"make a blog\"".to_string());
        prompts.reverse();

        let copy = d.clone();
        assert_eq!(d.example_prompts().len(), 3);
        assert_eq!(d.example_prompts()[0], "\"make a hello world app\"");
        assert_eq!(copy, d);
    }

    #[test]
    fn test_descriptor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApplicationDescriptor>();
    }

    #[test]
    fn test_empty_key_still_constructs() {
        let d = ApplicationDescriptor::new(BASE, "", EXAMPLES);
        assert_eq!(d.api_key().expose(), "");

        let err = d.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "apiKey" }));
    }

    #[test]
    fn test_missing_base_url_fails_validation() {
        let d = ApplicationDescriptor::new("", "K123", EXAMPLES);
        assert_eq!(d.api_url(), APP_SLUG);
        let err = d.validate().unwrap_err();
        assert_eq!(err.field(), Some("apiUrl"));
    }

    #[test]
    fn test_base_without_trailing_slash_fails_validation() {
        let d = ApplicationDescriptor::new(
            "https://api.example.com",
            "K",
            "https://examples.example.com",
        );
        assert_eq!(d.api_url(), "https://api.example.comdefault-single-page-websit");
        let err = d.validate().unwrap_err();
        assert!(matches!(err, ConfigError::SlugNotInPath { field: "apiUrl", .. }));

        let d = ApplicationDescriptor::new(BASE, "K", "https://examples.example.com/v1");
        let err = d.validate().unwrap_err();
        assert_eq!(err.field(), Some("infoUrl"));

        let nested = ApplicationDescriptor::new("https://api.example.com/v1/", "K", EXAMPLES);
        assert!(nested.validate().is_ok());
    }

    #[test]
    fn test_valid_descriptor_passes() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::builder()
            .backend_api_url(BASE)
            .aws_api_gateway_key("K123")
            .openai_examples_url(EXAMPLES)
            .build();
        let d = ApplicationDescriptor::from_settings(&settings);
        assert_eq!(d, ApplicationDescriptor::new(BASE, "K123", EXAMPLES));
    }

    #[test]
    fn test_asset_paths_resolve_under_root() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        let root = Path::new("public");
        assert!(d.avatar_path(root).starts_with(root));
        assert!(d.background_image_path(root).starts_with(root));

        assert!(require_asset_path("avatarUrl", "../secret.png").is_err());
        assert!(require_asset_path("avatarUrl", "/etc/passwd").is_err());
        assert!(require_asset_path("avatarUrl", "https://cdn.example.com/a.png").is_err());
        assert!(require_asset_path("avatarUrl", "./img/a.png").is_ok());
    }

    #[test]
    fn test_json_uses_camel_case_and_masks_key() {
        let d = ApplicationDescriptor::new(BASE, "K123", EXAMPLES);
        let masked = d.to_json_value(false).unwrap();
        assert_eq!(masked["apiUrl"], "https://api.example.com/default-single-page-websit");
        assert_eq!(masked["examplePrompts"][2], "\"make a recipe app\"");
        assert_ne!(masked["apiKey"], "K123");

        let revealed = d.to_json_value(true).unwrap();
        assert_eq!(revealed["apiKey"], "K123");
    }
}

//! Application constants
//!
//! Centralized location for the slug, display strings and settings defaults.

/// Slug appended to the backend and examples base URLs
pub const APP_SLUG: &str = "default-single-page-websit";

pub const APP_NAME: &str = "Single Page Website";
pub const ASSISTANT_NAME: &str = "Website Builder";

/// Avatar image, relative to the static asset root
pub const AVATAR_URL: &str = "applications/single-page-website/avatar.svg";

/// Background image, relative to the static asset root
pub const BACKGROUND_IMAGE_URL: &str = "applications/single-page-website/background.png";

pub const WELCOME_MESSAGE: &str =
    "Hi! I can generate a complete single-page website from a short description. What should we build?";

pub const PLACEHOLDER_TEXT: &str = "describe the website you want to build";

/// Example prompts, in display order
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "\"make a hello world app\"",
    "\"make a todo list app\"",
    "\"make a recipe app\"",
];

// Environment variable names
pub const ENV_BACKEND_API_URL: &str = "BACKEND_API_URL";
pub const ENV_AWS_API_GATEWAY_KEY: &str = "AWS_API_GATEWAY_KEY";
pub const ENV_OPENAI_EXAMPLES_URL: &str = "OPENAI_EXAMPLES_URL";
pub const ENV_ASSET_ROOT: &str = "APP_ASSET_ROOT";
pub const ENV_DEBUG_MODE: &str = "DEBUG_MODE";
pub const ENV_DUMP_DEFAULTS: &str = "DUMP_DEFAULTS";

/// Default static asset root
pub const DEFAULT_ASSET_ROOT: &str = "public";

/// Directory under the home dir holding the settings file
pub const CONFIG_DIR_NAME: &str = ".app-descriptor";
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

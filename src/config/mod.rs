// src/config/mod.rs
pub mod file;

pub use file::{load_default, load_from, FileConfig};

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

fn flag_or_env(flag: Option<String>, var: &str) -> Option<String> {
    flag.or_else(|| std::env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
}

/// `--api-key`, else `$OPENROUTER_API_KEY`.
pub fn resolve_api_key(flag: Option<String>) -> Option<String> {
    flag_or_env(flag, ENV_API_KEY)
}

/// `--github-token`, else `$GITHUB_TOKEN`.
pub fn resolve_github_token(flag: Option<String>) -> Option<String> {
    flag_or_env(flag, ENV_GITHUB_TOKEN)
}

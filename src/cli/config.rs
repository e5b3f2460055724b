use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("RK_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("recordkeeper")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// File holding the token, cached user, theme and redirect path
pub fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("session.json"))
}

/// `--server` beats `RK_API_URL`, which beats the local default
pub fn resolve_server_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("RK_API_URL").ok())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

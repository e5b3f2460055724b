use clap::ValueEnum;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::Context;
use crate::types::Theme;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

pub async fn handle(mode: Option<ThemeMode>, ctx: &mut Context) -> anyhow::Result<()> {
    let (theme, message) = match mode {
        None => {
            let theme = ctx.app.theme();
            (theme, format!("Theme is {}", theme))
        }
        Some(ThemeMode::Toggle) => {
            let theme = ctx.app.toggle_theme();
            (theme, format!("Theme switched to {}", theme))
        }
        Some(ThemeMode::Light) => (ctx.app.set_theme(Theme::Light), "Theme set to light".to_string()),
        Some(ThemeMode::Dark) => (ctx.app.set_theme(Theme::Dark), "Theme set to dark".to_string()),
    };

    output_success(&ctx.output, &message, Some(json!({ "theme": theme })))
}

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_profile, output_success, value_or_prompt};
use crate::cli::Context;
use crate::client::Route;
use crate::types::Theme;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show,

    #[command(about = "Change your display name or theme")]
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, help = "light or dark")]
        theme: Option<Theme>,
    },

    #[command(about = "Change your password (prompts for anything not given)")]
    Password {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        new: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: ProfileCommands, ctx: &mut Context) -> anyhow::Result<()> {
    ctx.enter(Route::Profile).await?;
    let mut screen = ctx.app.profile_screen();
    if !screen.load().await {
        let message = screen.error().unwrap_or("Could not load profile").to_string();
        return Err(ctx.fail(message));
    }

    match cmd {
        ProfileCommands::Show => match screen.profile() {
            Some(profile) => output_profile(&ctx.output, profile),
            None => anyhow::bail!("Could not load profile"),
        },
        ProfileCommands::Update { name, theme } => {
            if name.is_none() && theme.is_none() {
                anyhow::bail!("Nothing to update; pass --name and/or --theme");
            }
            if let Some(name) = name {
                screen.name = name;
            }
            if let Some(theme) = theme {
                screen.theme = theme;
            }

            match screen.save_details().await {
                Some(profile) => {
                    ctx.app.profile_saved(profile.clone());
                    output_success(&ctx.output, "Profile updated", Some(json!({ "profile": profile })))
                }
                None if !screen.field_errors().is_empty() => {
                    anyhow::bail!("{}", screen.field_errors())
                }
                None => {
                    let message = screen.error().unwrap_or("Could not update profile").to_string();
                    Err(ctx.fail(message))
                }
            }
        }
        ProfileCommands::Password { current, new, confirm } => {
            let current = value_or_prompt(current, "Current password: ").await?;
            let new = value_or_prompt(new, "New password: ").await?;
            let confirm = value_or_prompt(confirm, "Confirm new password: ").await?;

            if screen.change_password(&current, &new, &confirm).await {
                return output_success(&ctx.output, "Password changed", None);
            }
            if !screen.field_errors().is_empty() {
                anyhow::bail!("{}", screen.field_errors());
            }
            let message = screen.error().unwrap_or("Could not change password").to_string();
            Err(ctx.fail(message))
        }
    }
}

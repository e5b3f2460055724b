use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, value_or_prompt};
use crate::cli::{Context, OutputFormat};
use crate::client::screens::LoginScreen;
use crate::client::Route;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and store the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show who is signed in")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = value_or_prompt(password, "Password: ").await?;
            let mut screen = LoginScreen::with_credentials(email, password);

            let route = ctx.app.login(&mut screen).await;
            if route == Route::Login {
                if !screen.field_errors().is_empty() {
                    anyhow::bail!("{}", screen.field_errors());
                }
                anyhow::bail!("{}", screen.message().unwrap_or("Login failed"));
            }

            let user = ctx.app.session().user().cloned();
            let name = user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
            output_success(
                &ctx.output,
                &format!("Signed in as {}", name),
                Some(json!({ "user": user, "next": route.path() })),
            )
        }
        AuthCommands::Logout => {
            ctx.app.logout();
            output_success(&ctx.output, "Signed out", None)
        }
        AuthCommands::Status => {
            ctx.app.start().await;
            let session = ctx.app.session();

            match &ctx.output {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "server": ctx.server_url,
                            "authenticated": session.is_authenticated(),
                            "user": session.user(),
                            "error": session.error(),
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Server: {}", ctx.server_url);
                    match session.user() {
                        Some(user) => println!("Signed in as {} <{}>", user.name, user.email),
                        None => println!("Not signed in"),
                    }
                    if let Some(error) = session.error() {
                        println!("Note: {}", error);
                    }
                }
            }
            Ok(())
        }
    }
}

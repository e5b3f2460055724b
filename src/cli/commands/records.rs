use clap::Subcommand;
use futures::future::try_join_all;
use serde_json::json;

use crate::cli::utils::{output_record, output_records, output_success, TerminalConfirm};
use crate::cli::Context;
use crate::client::screens::{AlwaysConfirm, Confirm, DeleteOutcome, EditorMode};
use crate::client::Route;

#[derive(Subcommand)]
pub enum RecordCommands {
    #[command(about = "List records")]
    List {
        #[arg(long, short, help = "Only show records whose title or description contains this text")]
        filter: Option<String>,
    },

    #[command(about = "Show one or more records")]
    Show {
        #[arg(required = true, help = "Record ids")]
        ids: Vec<u64>,
    },

    #[command(about = "Create a record")]
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },

    #[command(about = "Edit a record")]
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Delete a record")]
    Delete {
        id: u64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: RecordCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        RecordCommands::List { filter } => {
            ctx.enter(Route::List).await?;
            let mut screen = ctx.app.list_screen();
            if !screen.load().await {
                let message = screen.error().unwrap_or("Could not load records").to_string();
                return Err(ctx.fail(message));
            }

            if let Some(filter) = filter {
                screen.set_filter(filter);
            }
            output_records(&ctx.output, &screen.visible())
        }
        RecordCommands::Show { ids } => {
            ctx.enter(Route::List).await?;
            let api = ctx.app.api();

            let records = match try_join_all(ids.iter().map(|id| api.fetch_record(*id))).await {
                Ok(records) => records,
                Err(err) => return Err(ctx.fail(err.user_message("Could not load record"))),
            };

            for record in &records {
                output_record(&ctx.output, record)?;
            }
            Ok(())
        }
        RecordCommands::Create { title, description } => {
            ctx.enter(Route::Create).await?;
            let mut editor = ctx.app.editor(EditorMode::Create);
            editor.title = title;
            editor.description = description;

            match editor.submit().await {
                Some(record) => output_success(
                    &ctx.output,
                    &format!("Created record {}", record.id),
                    Some(json!({ "record": record })),
                ),
                None if !editor.field_errors().is_empty() => {
                    anyhow::bail!("{}", editor.field_errors())
                }
                None => {
                    let message = editor.error().unwrap_or("Could not save record").to_string();
                    Err(ctx.fail(message))
                }
            }
        }
        RecordCommands::Update { id, title, description } => {
            ctx.enter(Route::Edit(id)).await?;
            let mut editor = ctx.app.editor(EditorMode::Edit(id));
            if !editor.load().await {
                let message = editor.error().unwrap_or("Could not load record").to_string();
                return Err(ctx.fail(message));
            }

            if let Some(title) = title {
                editor.title = title;
            }
            if let Some(description) = description {
                editor.description = description;
            }

            match editor.submit().await {
                Some(record) => output_success(
                    &ctx.output,
                    &format!("Updated record {}", record.id),
                    Some(json!({ "record": record })),
                ),
                None if !editor.field_errors().is_empty() => {
                    anyhow::bail!("{}", editor.field_errors())
                }
                None => {
                    let message = editor.error().unwrap_or("Could not save record").to_string();
                    Err(ctx.fail(message))
                }
            }
        }
        RecordCommands::Delete { id, yes } => {
            ctx.enter(Route::List).await?;
            let mut screen = ctx.app.list_screen();
            if !screen.load().await {
                let message = screen.error().unwrap_or("Could not load records").to_string();
                return Err(ctx.fail(message));
            }

            let confirm: &dyn Confirm = if yes { &AlwaysConfirm } else { &TerminalConfirm };
            match screen.delete(id, confirm).await {
                DeleteOutcome::Deleted => output_success(
                    &ctx.output,
                    &format!("Deleted record {}", id),
                    Some(json!({ "id": id })),
                ),
                DeleteOutcome::Cancelled => output_success(&ctx.output, "Nothing deleted", None),
                DeleteOutcome::Unknown => anyhow::bail!("Record {} not found", id),
                DeleteOutcome::Failed(message) => Err(ctx.fail(message)),
            }
        }
    }
}

mod common;

use anyhow::Result;
use reqwest::Method;
use recordkeeper::client::notify::NotificationKind;
use recordkeeper::client::screens::{AlwaysConfirm, DeleteOutcome, EditorMode};
use recordkeeper::types::Theme;

async fn signed_in(server: &common::TestServer) -> Result<common::ClientHarness> {
    let mut client = server.client()?;
    let outcome = client.app.session_mut().login(common::EMAIL, common::PASSWORD).await;
    anyhow::ensure!(outcome.success, "login failed: {:?}", outcome.message);
    Ok(client)
}

#[tokio::test]
async fn delete_removes_exactly_one_record() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = signed_in(&server).await?;

    let mut list = client.app.list_screen();
    assert!(list.load().await);
    assert_eq!(list.records().len(), 5);

    assert_eq!(list.delete(3, &AlwaysConfirm).await, DeleteOutcome::Deleted);
    assert_eq!(server.count(&Method::DELETE), 1);

    let ids: Vec<u64> = list.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);

    let (_, remaining) = server.state.store.counts().await;
    assert_eq!(remaining, 4);

    let kinds: Vec<NotificationKind> = client.notifications.active().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Success]);
    Ok(())
}

#[tokio::test]
async fn failed_delete_keeps_the_list() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = signed_in(&server).await?;

    let mut list = client.app.list_screen();
    assert!(list.load().await);

    // Someone else removes it first
    server.state.store.delete_record(2).await?;

    assert!(matches!(list.delete(2, &AlwaysConfirm).await, DeleteOutcome::Failed(_)));
    assert_eq!(list.records().len(), 5);
    assert_eq!(server.count(&Method::DELETE), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_record_never_reaches_the_server() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = signed_in(&server).await?;
    let before = server.total_requests();

    let mut editor = client.app.editor(EditorMode::Create);
    editor.title = "ab".into();
    editor.description = "too short".into();

    assert!(editor.submit().await.is_none());
    assert!(editor.field_errors().get("title").is_some());
    assert!(editor.field_errors().get("description").is_some());
    assert_eq!(server.total_requests(), before);
    assert_eq!(server.count(&Method::POST), 1, "only the login POST");
    Ok(())
}

#[tokio::test]
async fn create_then_edit_a_record() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = signed_in(&server).await?;

    let mut editor = client.app.editor(EditorMode::Create);
    editor.title = "  Cargo workspaces  ".into();
    editor.description = "Sharing a lockfile between crates".into();
    let created = editor.submit().await.expect("record created");
    assert_eq!(created.title, "Cargo workspaces");
    assert!(editor.title.is_empty(), "create form resets");

    let mut editor = client.app.editor(EditorMode::Edit(created.id));
    assert_eq!(editor.mode(), EditorMode::Edit(created.id));
    assert!(editor.load().await);
    assert!(!editor.is_loading());
    assert_eq!(editor.title, "Cargo workspaces");

    editor.title = "Cargo features".into();
    let updated = editor.submit().await.expect("record updated");
    assert_eq!(updated.id, created.id);
    assert_eq!(server.state.store.get_record(created.id).await?.title, "Cargo features");
    Ok(())
}

#[tokio::test]
async fn editing_a_missing_record_reports_it() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = signed_in(&server).await?;

    let mut editor = client.app.editor(EditorMode::Edit(404));
    assert!(!editor.load().await);
    assert_eq!(editor.error(), Some("Record 404 not found"));
    Ok(())
}

#[tokio::test]
async fn profile_screen_saves_name_and_theme() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut client = signed_in(&server).await?;

    let mut screen = client.app.profile_screen();
    assert!(screen.load().await);
    assert_eq!(screen.name, "Nuevo Usuario");

    screen.name = "Ana".into();
    screen.theme = Theme::Dark;
    let profile = screen.save_details().await.expect("profile saved");
    assert!(!screen.is_saving());
    client.app.profile_saved(profile);

    assert_eq!(client.app.theme(), Theme::Dark);
    assert_eq!(client.app.session().user().map(|u| u.name.as_str()), Some("Ana"));
    Ok(())
}

#[tokio::test]
async fn wrong_current_password_signs_the_user_out() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut client = signed_in(&server).await?;

    let mut screen = client.app.profile_screen();
    assert!(!screen.change_password("wrong-one", "secret99", "secret99").await);
    assert_eq!(screen.error(), Some("Current password is incorrect"));

    assert_eq!(client.app.navigate(recordkeeper::client::Route::Profile), recordkeeper::client::Route::Login);
    Ok(())
}

mod support;

use chrono::{TimeZone, Utc};
use function_app::{
    models::{DataError, TodoItem},
    services::{schema::SeedMode, DataContext, DataContextOptions},
};
use std::time::{Duration, Instant};
use support::{context, MEMORY_STORE, UNREACHABLE_STORE};
use tokio::net::TcpListener;

#[tokio::test]
async fn probe_succeeds_against_reachable_store() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);
    let probe = ctx.probe().await;

    assert!(probe.success);
    assert_eq!(probe.error_message, None);
    assert_eq!(probe.error_text(), "");
}

#[tokio::test]
async fn probe_reports_unreachable_store_without_failing() {
    let ctx = context(UNREACHABLE_STORE, SeedMode::Enabled);
    let probe = ctx.probe().await;

    assert!(!probe.success);
    assert!(!probe.error_text().is_empty());
}

#[tokio::test]
async fn probe_reports_unopenable_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing").join("todos.db");
    let ctx = context(&format!("sqlite://{}", missing.display()), SeedMode::Enabled);

    let probe = ctx.probe().await;
    assert!(!probe.success);
    assert!(probe.error_message.is_some());
}

#[tokio::test]
async fn silent_store_is_reported_after_the_timeout() {
    // Accepts connections and never answers the handshake.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let ctx = DataContext::new(
        format!("postgres://app:secret@{addr}/todos"),
        DataContextOptions {
            max_connections: 1,
            probe_timeout: Duration::from_secs(1),
            seed: SeedMode::Disabled,
        },
    )
    .unwrap();

    let started = Instant::now();
    let probe = ctx.probe().await;
    let elapsed = started.elapsed();

    assert!(!probe.success);
    assert!(probe.error_text().contains("timed out"), "{}", probe.error_text());
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
}

#[tokio::test]
async fn descriptor_accessor_works_before_any_connection() {
    let ctx = context(UNREACHABLE_STORE, SeedMode::Enabled);
    assert_eq!(ctx.connection_descriptor(), UNREACHABLE_STORE);
}

#[test]
fn unusable_descriptors_are_rejected_at_construction() {
    let options = DataContextOptions {
        max_connections: 1,
        probe_timeout: Duration::from_secs(1),
        seed: SeedMode::Disabled,
    };

    assert!(matches!(
        DataContext::new("mssql://sa@db/todos", options),
        Err(DataError::UnsupportedStore(_))
    ));
    assert!(matches!(
        DataContext::new("Server=db;Database=todos;", options),
        Err(DataError::SqlServerDescriptor)
    ));
    assert!(matches!(
        DataContext::new("postgres://[::1/todos", options),
        Err(DataError::InvalidDescriptor(_))
    ));
}

#[test]
fn managed_identity_connection_string_is_reported_as_sql_server() {
    let result = DataContext::new(
        "Server=tcp:db.database.windows.net,1433;Database=todos;Authentication=Active Directory Managed Identity;",
        DataContextOptions {
            max_connections: 1,
            probe_timeout: Duration::from_secs(1),
            seed: SeedMode::Disabled,
        },
    );

    let err = result.err().unwrap();
    assert!(matches!(err, DataError::SqlServerDescriptor));
    assert!(err.to_string().contains("SQL Server"));
}

#[tokio::test]
async fn schema_setup_twice_yields_two_seed_rows() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);

    ctx.apply_schema().await.unwrap();
    ctx.apply_schema().await.unwrap();

    let items = ctx.list_todo_items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].id, items[0].title.as_str(), items[0].is_complete), (1, "Sample Task 1", false));
    assert_eq!((items[1].id, items[1].title.as_str(), items[1].is_complete), (2, "Sample Task 2", true));
}

#[tokio::test]
async fn seeding_disabled_leaves_table_empty() {
    let ctx = context(MEMORY_STORE, SeedMode::Disabled);

    ctx.ensure_schema().await.unwrap();
    assert!(ctx.list_todo_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn ensure_schema_runs_once_per_context() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);
    ctx.ensure_schema().await.unwrap();

    sqlx::query("DELETE FROM todo_items")
        .execute(ctx.pool())
        .await
        .unwrap();

    // Already initialised: the seed rows are not put back.
    ctx.ensure_schema().await.unwrap();
    assert!(ctx.list_todo_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_title_is_rejected_before_reaching_the_store() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);

    let err = ctx
        .insert_todo_item(&TodoItem::new("x".repeat(201)))
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::TitleTooLong(201)));
    assert_eq!(ctx.list_todo_items().await.unwrap().len(), 2);
}

#[tokio::test]
async fn store_check_rejects_oversized_title() {
    let ctx = context(MEMORY_STORE, SeedMode::Disabled);
    ctx.ensure_schema().await.unwrap();

    let result = sqlx::query("INSERT INTO todo_items (id, title, is_complete) VALUES ($1, $2, $3)")
        .bind(10_i64)
        .bind("y".repeat(201))
        .bind(false)
        .execute(ctx.pool())
        .await;

    assert!(result.is_err());
    assert!(ctx.list_todo_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn store_rejects_missing_title() {
    let ctx = context(MEMORY_STORE, SeedMode::Disabled);
    ctx.ensure_schema().await.unwrap();

    let result = sqlx::query("INSERT INTO todo_items (is_complete) VALUES ($1)")
        .bind(false)
        .execute(ctx.pool())
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn insert_takes_id_and_timestamp_from_the_store() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);

    let mut item = TodoItem::new("z".repeat(200));
    item.id = 42;
    item.is_complete = true;
    item.created_at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();

    let stored = ctx.insert_todo_item(&item).await.unwrap();

    assert_eq!(stored.id, 3);
    assert_eq!(stored.title.chars().count(), 200);
    assert!(stored.is_complete);
    assert!((Utc::now() - stored.created_at).num_seconds().abs() < 300);
}

#[tokio::test]
async fn find_returns_seed_row_or_none() {
    let ctx = context(MEMORY_STORE, SeedMode::Enabled);

    let found = ctx.find_todo_item(2).await.unwrap().unwrap();
    assert_eq!(found.title, "Sample Task 2");
    assert!(found.is_complete);

    assert!(ctx.find_todo_item(99).await.unwrap().is_none());
}

#[tokio::test]
async fn completion_flag_survives_the_store_both_ways() {
    let ctx = context(MEMORY_STORE, SeedMode::Disabled);

    let open = ctx.insert_todo_item(&TodoItem::new("open")).await.unwrap();
    let mut done = TodoItem::new("done");
    done.is_complete = true;
    let done = ctx.insert_todo_item(&done).await.unwrap();

    assert!(!open.is_complete);
    assert!(done.is_complete);

    let listed: Vec<(String, bool)> = ctx
        .list_todo_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| (item.title, item.is_complete))
        .collect();
    assert_eq!(listed, vec![("open".to_string(), false), ("done".to_string(), true)]);
}

#[tokio::test]
async fn in_memory_store_stays_consistent_with_a_larger_configured_pool() {
    let ctx = DataContext::new(
        MEMORY_STORE,
        DataContextOptions {
            max_connections: 4,
            probe_timeout: Duration::from_secs(2),
            seed: SeedMode::Enabled,
        },
    )
    .unwrap();

    let (first, second) = tokio::join!(ctx.list_todo_items(), ctx.list_todo_items());
    assert_eq!(first.unwrap().len(), 2);
    assert_eq!(second.unwrap().len(), 2);
}

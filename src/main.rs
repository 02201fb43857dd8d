use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use checklist_sync::checklist::{spawn_sync_loop, ChecklistApi, PromoteDetails};
use checklist_sync::config::ChecklistConfig;
use checklist_sync::logging::init_tracing;
use checklist_sync::tasks::{InMemoryTaskStore, Task, TaskId, TaskPatch, TaskStatus, TaskStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = ChecklistConfig::from_env().context("loading checklist config")?;
    let date_format = config.date_display_format.clone();

    // ── Task store ──────────────────────────────────────────────────────
    let store = InMemoryTaskStore::with_tasks([Task::new("t1", "Kickoff call", "Rui")
        .with_status(TaskStatus::Doing)
        .with_project("demo")]);

    let api = ChecklistApi::new("demo", store.clone(), config);
    let sync_loop = spawn_sync_loop(Arc::clone(&api));

    // ── Walkthrough ─────────────────────────────────────────────────────
    let kickoff = api
        .add_item("Kickoff call", NaiveDate::from_ymd_opt(2025, 1, 10))
        .await?;
    let review = api
        .add_item("Design review", NaiveDate::from_ymd_opt(2025, 2, 1))
        .await?;

    let linked = api.link_to_task(kickoff.id, &TaskId::from("t1")).await?;
    info!(item = %linked.item.text, task = %linked.task_title, "Linked");

    store
        .update(&TaskId::from("t1"), TaskPatch::status(TaskStatus::Done))
        .await?;
    // Let the sync loop pick the change up.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let promoted = api
        .promote_to_task(review.id, PromoteDetails::for_assignee("Ana"))
        .await?;
    info!(task_id = %promoted.task_id, "Promoted");

    api.unlink_from_task(kickoff.id).await?;

    // ── Report ──────────────────────────────────────────────────────────
    for item in api.items().await.iter() {
        info!(
            id = item.id,
            text = %item.text,
            due = %item.display_due_date(&date_format),
            glyph = %api.status_glyph(item),
            "Checklist item"
        );
    }
    let summary = api.progress_summary().await;
    println!("{}", serde_json::to_string_pretty(api.items().await.as_slice())?);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    sync_loop.abort();
    Ok(())
}

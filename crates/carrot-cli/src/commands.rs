use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::cli::Commands;
use carrot_client::MarketClient;
use carrot_core::{AuditRow, Tab, Task, TaskList};
use carrot_dashboard::{Dashboard, DashboardConfig, Page, Poller};

pub async fn execute(command: Commands, config: DashboardConfig) -> Result<()> {
    let client = MarketClient::with_timeout(&config.api_base_url, config.request_timeout())?;
    let dashboard = Dashboard::new(Arc::new(client));

    match command {
        Commands::Audit => {
            dashboard.load_reference_data().await?;
            let page = dashboard.page().await;
            print!("{}", format_audit(&page.audit));
        }

        Commands::Tasks => {
            dashboard.refresh_tasks().await?;
            let page = dashboard.page().await;
            print!("{}", format_tasks(&page.tasks));
        }

        Commands::Status { task_id } => {
            let task = dashboard.api().task(&task_id).await?;
            print!("{}", format_task_detail(&task));
        }

        Commands::Download {
            table,
            symbols,
            months,
        } => {
            println!("Starting download for {}...", table);
            let task = dashboard.advanced_download(&table, &symbols, &months).await?;
            println!("✓ Task created: {}", task.task_id);
            println!();
            print!("{}", format_tasks(&dashboard.page().await.tasks));
        }

        Commands::Quick { table, months } => {
            println!("Starting download for {}...", table);
            let task = dashboard.quick_download(&table, &months).await?;
            println!("✓ Task created: {}", task.task_id);
            println!();
            print!("{}", format_tasks(&dashboard.page().await.tasks));
        }

        Commands::Stop { task_id } => {
            let message = dashboard.stop_task(&task_id).await?;
            println!("✓ {}", message);
        }

        Commands::Health => {
            let health = dashboard.api().health().await?;
            println!("Backend: {}", config.api_base_url);
            println!("  Status: {}", health.status);
            if let Some(name) = health.app_name {
                println!("  App: {}", name);
            }
            if let Some(debug) = health.debug_mode {
                println!("  Debug mode: {}", debug);
            }
        }

        Commands::Watch { tab } => {
            let tab: Tab = tab.into();
            dashboard.set_active_tab(tab).await;
            watch(dashboard, &config).await;
        }

        Commands::Serve { .. } => {
            carrot_web::serve(&config).await?;
        }
    }

    Ok(())
}

/// Re-print the watched section on every render until Ctrl-C.
async fn watch(dashboard: Dashboard, config: &DashboardConfig) {
    let mut revisions = dashboard.subscribe();
    let poller = Poller::new(dashboard.clone(), config.poll_interval());

    let printer = async {
        while revisions.changed().await.is_ok() {
            let page = dashboard.page().await;
            print!("{}", format_page(&page));
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    tokio::select! {
        _ = poller.run_until(shutdown) => {}
        _ = printer => {}
    }
}

fn format_page(page: &Page) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    match page.active_tab {
        Tab::Audit => out.push_str(&format_audit(&page.audit)),
        Tab::Tasks => out.push_str(&format_tasks(&page.tasks)),
    }
    out
}

pub fn format_audit(rows: &[AuditRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<10} {:>10}  {:<25} {:<8} {}",
        "TABLE", "STORAGE", "ROWS", "DATE RANGE", "STATUS", "ACTION"
    );

    for row in rows {
        let _ = writeln!(
            out,
            "{:<28} {:<10} {:>10}  {:<25} {:<8} {}",
            row.table_name,
            row.storage_type,
            row.row_count,
            row.date_range,
            row.availability.label(),
            row.action_label
        );
    }

    out
}

pub fn format_tasks(tasks: &TaskList) -> String {
    let mut out = String::new();

    match tasks {
        TaskList::Empty => {
            let _ = writeln!(out, "no tasks");
        }
        TaskList::Cards(cards) => {
            for card in cards {
                let _ = writeln!(
                    out,
                    "{}  [{}]  {:>6.1}%  {}",
                    card.short_id, card.badge.label, card.progress, card.updated_time
                );
                if !card.message.is_empty() {
                    let _ = writeln!(out, "    {}", card.message);
                }
            }
        }
    }

    out
}

fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task: {}", task.task_id);
    if let Some(task_type) = &task.task_type {
        let _ = writeln!(out, "  Type: {}", task_type);
    }
    let _ = writeln!(out, "  Status: {}", task.status.badge().label);
    let _ = writeln!(out, "  Progress: {:.1}%", task.progress);
    let _ = writeln!(out, "  Message: {}", task.message);
    if let Some(created_at) = task.created_at {
        let _ = writeln!(out, "  Created: {}", created_at);
    }
    if let Some(updated_at) = task.updated_at {
        let _ = writeln!(out, "  Updated: {}", updated_at);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrot_core::{audit_rows, task_list, Metadata, TableConfig, TaskStatus, ViewModel};

    #[test]
    fn test_format_audit_missing_row() {
        let view = ViewModel::new(
            vec![("T1".to_string(), TableConfig::new("parquet"))].into_iter().collect(),
            Metadata::new(),
        );

        let out = format_audit(&audit_rows(&view));
        let line = out.lines().nth(1).unwrap();

        assert!(line.starts_with("T1 "));
        assert!(line.contains("parquet"));
        assert!(line.contains(" 0  -"));
        assert!(line.contains("missing"));
        assert!(line.ends_with("download now"));
    }

    #[test]
    fn test_format_empty_tasks() {
        assert_eq!(format_tasks(&TaskList::Empty), "no tasks\n");
    }

    #[test]
    fn test_format_tasks() {
        let tasks = vec![Task {
            task_id: "0f8fad5b-d9cb-469f".to_string(),
            status: TaskStatus::Running,
            progress: 33.333,
            message: "downloading 2025-01 (1/3)".to_string(),
            updated_at: Some("2025-01-03T09:15:30".parse().unwrap()),
            task_type: None,
            created_at: None,
        }];

        let out = format_tasks(&task_list(&tasks));

        assert_eq!(
            out,
            "0f8fad5b...  [Running]    33.3%  09:15:30\n    downloading 2025-01 (1/3)\n"
        );
    }
}

//! HTML rendering for the browser surface.
//!
//! Templates are named `*.html`, so minijinja escapes every interpolated
//! value; backend strings never reach the page as markup.

use carrot_core::{AuditRow, TaskList};
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};

use crate::{Page, Result};

const PAGE_TEMPLATE: &str = "page.html";
const AUDIT_TEMPLATE: &str = "audit.html";
const TASKS_TEMPLATE: &str = "tasks.html";

/// Download dialog and advanced form contents, kept across a failed submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub advanced: bool,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub symbols: String,
    #[serde(default)]
    pub months: String,
}

impl DownloadForm {
    /// Quick dialog opened from an audit row.
    pub fn quick(table_name: impl Into<String>) -> Self {
        Self {
            open: true,
            table_name: table_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageOptions {
    /// Blocking message shown on load.
    pub alert: Option<String>,
    pub form: DownloadForm,
    pub poll_interval_secs: u64,
}

pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(AUDIT_TEMPLATE, include_str!("../templates/audit.html"))?;
        env.add_template(TASKS_TEMPLATE, include_str!("../templates/tasks.html"))?;
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/page.html"))?;

        Ok(Self { env })
    }

    pub fn render_page(&self, page: &Page, options: &PageOptions) -> Result<String> {
        let template = self.env.get_template(PAGE_TEMPLATE)?;
        Ok(template.render(context! {
            active_tab => page.active_tab,
            audit_rows => &page.audit,
            task_cards => page.tasks.cards(),
            alert => &options.alert,
            form => &options.form,
            poll_interval_ms => options.poll_interval_secs * 1000,
        })?)
    }

    pub fn render_audit(&self, rows: &[AuditRow]) -> Result<String> {
        let template = self.env.get_template(AUDIT_TEMPLATE)?;
        Ok(template.render(context! { audit_rows => rows })?)
    }

    pub fn render_tasks(&self, tasks: &TaskList) -> Result<String> {
        let template = self.env.get_template(TASKS_TEMPLATE)?;
        Ok(template.render(context! { task_cards => tasks.cards() })?)
    }
}

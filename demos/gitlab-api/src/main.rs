//! GitLab API Example
//!
//! Declares a few GitLab option sets and calls, then lists projects.
//! Set `GITLAB_TOKEN` (and optionally `GITLAB_URL`) to hit a real instance.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::path::PathBuf;

use tanuki::NoAuth;
use tanuki::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// A GitLab project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
}

/// A GitLab issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub iid: u64,
    pub title: String,
    pub state: String,
}

// ============================================================================
// Option sets
// ============================================================================

#[derive(Debug, Clone, Copy, OptionEnum)]
pub enum IssueState {
    Opened,
    Closed,
    All,
}

#[derive(Debug, Clone, Copy, OptionEnum)]
pub enum OrderBy {
    CreatedAt,
    UpdatedAt,
    #[option(rename = "last_activity_at")]
    Activity,
}

#[derive(Debug, Default, Options)]
pub struct ListProjects {
    pub search: Option<String>,
    pub membership: Option<bool>,
    pub order_by: Option<OrderBy>,
}

#[derive(Debug, Default, Options)]
pub struct ListIssues {
    pub id: Option<String>,
    pub state: Option<IssueState>,
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Default, Options)]
pub struct CreateIssue {
    pub id: Option<String>,
    #[option(body)]
    pub title: Option<String>,
    #[option(body)]
    pub labels: Option<String>,
}

/// Editing takes everything creating does, plus the state transition.
#[derive(Debug, Default, Options)]
pub struct EditIssue {
    #[option(flatten)]
    pub base: CreateIssue,
    pub issue_iid: Option<u64>,
    #[option(body)]
    pub state_event: Option<String>,
}

#[derive(Debug, Default, Options)]
pub struct UploadFile {
    pub id: Option<String>,
    #[option(file)]
    pub file: Option<PathBuf>,
}

// ============================================================================
// Calls
// ============================================================================

pub fn list_projects(search: &str) -> ApiRequest {
    ApiRequest::get("/projects")
        .configure(|o: &mut ListProjects| {
            o.search = Some(search.to_string());
            o.membership = Some(true);
            o.order_by = Some(OrderBy::Activity);
        })
        .per_page(20)
}

pub fn list_issues(project: &str, state: IssueState, labels: &[&str]) -> ApiRequest {
    ApiRequest::get("/projects/{id}/issues").configure(|o: &mut ListIssues| {
        o.id = Some(project.to_string());
        o.state = Some(state);
        o.labels = Some(labels.iter().map(ToString::to_string).collect());
    })
}

pub fn close_issue(project: &str, iid: u64) -> ApiRequest {
    ApiRequest::put("/projects/{id}/issues/{issue_iid}").configure(|o: &mut EditIssue| {
        o.base.id = Some(project.to_string());
        o.issue_iid = Some(iid);
        o.state_event = Some("close".to_string());
    })
}

pub fn upload_file(project: &str, file: PathBuf) -> ApiRequest {
    ApiRequest::post("/projects/{id}/uploads").configure(|o: &mut UploadFile| {
        o.id = Some(project.to_string());
        o.file = Some(file);
    })
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> tanuki::Result<()> {
    let base_url =
        std::env::var("GITLAB_URL").unwrap_or_else(|_| "https://gitlab.com/api/v4".to_string());

    let http = HyperClient::builder().with_logging().build();
    let mut gitlab = ApiClient::new(http, &base_url)?;

    println!("=== Materialized requests ===");
    for request in [
        list_projects("tanuki"),
        list_issues("group/project", IssueState::Opened, &["bug", "ui"]),
        close_issue("group/project", 7),
    ] {
        let built = request.build(gitlab.base_url(), &NoAuth)?;
        println!("{} {}", built.method(), built.full_url());
    }

    let Ok(token) = std::env::var("GITLAB_TOKEN") else {
        println!("\nSet GITLAB_TOKEN to list your projects.");
        return Ok(());
    };
    gitlab = gitlab.with_bearer_token(token);

    let first = gitlab.fetch::<Vec<Project>>(list_projects("")).await?;
    println!(
        "\n=== Projects (page {} of {}) ===",
        first.current_page(),
        first.total_pages()
    );
    let rest = first.next_pages(Some(2)).await?;
    for page in std::iter::once(&first).chain(&rest) {
        for project in page.decode()? {
            println!("{:>8} {}", project.id, project.path_with_namespace);
        }
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

//! Startup bootstrap and sample data
//!
//! [`bootstrap`] guarantees the demo tenant exists and runs on every start.
//! [`seed_sample_data`] fills in a second tenant with projects, tasks and
//! comments for local development. Both are idempotent: rows are matched by
//! natural key (slug, project name, task title, comment author) and only
//! created when missing.

use chrono::{Duration, Utc};
use validator::Validate;

use crate::error::TrackerResult;
use crate::models::comment::CreateComment;
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::project::{CreateProject, Project, ProjectStatus};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::store::Store;

/// Rows created by one seeding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub projects: usize,
    pub tasks: usize,
    pub comments: usize,
}

struct SampleProject {
    organization: &'static str,
    name: &'static str,
    description: &'static str,
    status: ProjectStatus,
    due_in_days: i64,
}

struct SampleTask {
    project: &'static str,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    assignee: &'static str,
    due_in_days: i64,
}

struct SampleComment {
    task: &'static str,
    author: &'static str,
    content: &'static str,
}

const SAMPLE_PROJECTS: &[SampleProject] = &[
    SampleProject {
        organization: "demo-org",
        name: "Website Redesign",
        description: "Complete redesign of the company website with modern UI/UX",
        status: ProjectStatus::Active,
        due_in_days: 30,
    },
    SampleProject {
        organization: "demo-org",
        name: "Mobile App Development",
        description: "Develop a new mobile application for iOS and Android",
        status: ProjectStatus::Active,
        due_in_days: 60,
    },
    SampleProject {
        organization: "demo-org",
        name: "Marketing Campaign",
        description: "Launch a comprehensive marketing campaign for Q4",
        status: ProjectStatus::OnHold,
        due_in_days: 45,
    },
    SampleProject {
        organization: "tech-startup",
        name: "MVP Development",
        description: "Build the minimum viable product for our SaaS platform",
        status: ProjectStatus::Active,
        due_in_days: 90,
    },
];

const SAMPLE_TASKS: &[SampleTask] = &[
    SampleTask {
        project: "Website Redesign",
        title: "Design Homepage",
        description: "Create wireframes and mockups for the homepage",
        status: TaskStatus::InProgress,
        assignee: "designer@demo-org.com",
        due_in_days: 7,
    },
    SampleTask {
        project: "Website Redesign",
        title: "Implement Navigation",
        description: "Build the main navigation component",
        status: TaskStatus::Todo,
        assignee: "developer@demo-org.com",
        due_in_days: 14,
    },
    SampleTask {
        project: "Website Redesign",
        title: "Content Migration",
        description: "Migrate existing content to the new design",
        status: TaskStatus::Done,
        assignee: "content@demo-org.com",
        due_in_days: -3,
    },
    SampleTask {
        project: "Mobile App Development",
        title: "Setup React Native",
        description: "Initialize React Native project and configure development environment",
        status: TaskStatus::Done,
        assignee: "mobile@demo-org.com",
        due_in_days: -5,
    },
    SampleTask {
        project: "Mobile App Development",
        title: "Design App Screens",
        description: "Create UI designs for all app screens",
        status: TaskStatus::InProgress,
        assignee: "designer@demo-org.com",
        due_in_days: 10,
    },
    SampleTask {
        project: "MVP Development",
        title: "Database Schema Design",
        description: "Design the database schema for the MVP",
        status: TaskStatus::Done,
        assignee: "backend@techstartup.com",
        due_in_days: -10,
    },
    SampleTask {
        project: "MVP Development",
        title: "User Authentication",
        description: "Implement user registration and login functionality",
        status: TaskStatus::InProgress,
        assignee: "backend@techstartup.com",
        due_in_days: 15,
    },
];

const SAMPLE_COMMENTS: &[SampleComment] = &[
    SampleComment {
        task: "Design Homepage",
        author: "designer@demo-org.com",
        content: "Started working on the homepage design. Will have mockups ready by Friday.",
    },
    SampleComment {
        task: "Design Homepage",
        author: "pm@demo-org.com",
        content: "Great progress! Make sure to include the new branding elements.",
    },
    SampleComment {
        task: "Design App Screens",
        author: "designer@demo-org.com",
        content: "Completed the login and dashboard screens. Moving on to the main features.",
    },
    SampleComment {
        task: "User Authentication",
        author: "backend@techstartup.com",
        content: "Authentication system is working well. Need to add password reset functionality.",
    },
];

fn tech_startup() -> CreateOrganization {
    CreateOrganization {
        id: None,
        name: "Tech Startup Inc.".to_string(),
        slug: "tech-startup".to_string(),
        contact_email: "hello@techstartup.com".to_string(),
    }
}

/// Ensures the demo organization exists
///
/// # Errors
///
/// Returns an error if the store is unreachable.
pub async fn bootstrap(store: &dyn Store) -> TrackerResult<Organization> {
    let demo = CreateOrganization::demo();
    demo.validate()?;

    let organization = store.ensure_organization(demo).await?;
    tracing::info!(
        organization_id = %organization.id,
        slug = %organization.slug,
        "Demo organization ready"
    );
    Ok(organization)
}

/// Inserts the sample organizations, projects, tasks and comments
///
/// Rows that already exist are left untouched, so running this twice
/// creates nothing the second time.
pub async fn seed_sample_data(store: &dyn Store) -> TrackerResult<SeedReport> {
    let mut report = SeedReport::default();

    let org = tech_startup();
    org.validate()?;
    let organizations = [bootstrap(store).await?, store.ensure_organization(org).await?];

    let today = Utc::now().date_naive();
    let now = Utc::now();

    let mut projects: Vec<Project> = Vec::new();
    for organization in &organizations {
        projects.extend(store.list_projects(&organization.id).await?);
    }

    for sample in SAMPLE_PROJECTS {
        let Some(organization) = organizations.iter().find(|o| o.slug == sample.organization)
        else {
            continue;
        };
        let exists = projects
            .iter()
            .any(|p| p.organization_id == organization.id && p.name == sample.name);
        if exists {
            continue;
        }

        let project = store
            .insert_project(
                &organization.id,
                CreateProject {
                    name: sample.name.to_string(),
                    description: Some(sample.description.to_string()),
                    status: Some(sample.status),
                    due_date: Some(today + Duration::days(sample.due_in_days)),
                },
            )
            .await?;
        projects.push(project);
        report.projects += 1;
    }

    let mut tasks: Vec<Task> = Vec::new();
    for sample in SAMPLE_TASKS {
        let Some(project) = projects.iter().find(|p| p.name == sample.project) else {
            continue;
        };

        let existing = store.list_tasks(&project.id).await?;
        if let Some(task) = existing.into_iter().find(|t| t.title == sample.title) {
            tasks.push(task);
            continue;
        }

        let task = store
            .insert_task(CreateTask {
                project_id: project.id.clone(),
                title: sample.title.to_string(),
                description: Some(sample.description.to_string()),
                status: Some(sample.status),
                assignee_email: Some(sample.assignee.to_string()),
                due_date: Some(now + Duration::days(sample.due_in_days)),
            })
            .await?;
        tasks.push(task);
        report.tasks += 1;
    }

    for sample in SAMPLE_COMMENTS {
        let Some(task) = tasks.iter().find(|t| t.title == sample.task) else {
            continue;
        };

        let existing = store.list_comments(&task.id).await?;
        if existing.iter().any(|c| c.author_email == sample.author) {
            continue;
        }

        store
            .insert_comment(CreateComment {
                task_id: task.id.clone(),
                content: sample.content.to_string(),
                author_email: sample.author.to_string(),
            })
            .await?;
        report.comments += 1;
    }

    tracing::info!(
        projects = report.projects,
        tasks = report.tasks,
        comments = report.comments,
        "Sample data seeded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::organization::{DEMO_ORGANIZATION_ID, DEMO_ORGANIZATION_SLUG};
    use crate::stats::project_stats;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let store = MemoryStore::new();

        let first = bootstrap(&store).await.unwrap();
        let second = bootstrap(&store).await.unwrap();

        assert_eq!(first.id, DEMO_ORGANIZATION_ID);
        assert_eq!(first.slug, DEMO_ORGANIZATION_SLUG);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_seed_sample_data() {
        let store = MemoryStore::new();

        let report = seed_sample_data(&store).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                projects: 4,
                tasks: 7,
                comments: 4,
            }
        );

        let demo = store
            .find_organization_by_slug("demo-org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.count_projects(&demo.id).await.unwrap(), 3);
        assert_eq!(store.count_organization_tasks(&demo.id).await.unwrap(), 5);

        let startup = store
            .find_organization_by_slug("tech-startup")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(startup.name, "Tech Startup Inc.");
        assert_eq!(store.count_projects(&startup.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_twice_creates_nothing() {
        let store = MemoryStore::new();
        seed_sample_data(&store).await.unwrap();

        let report = seed_sample_data(&store).await.unwrap();
        assert_eq!(report, SeedReport::default());
    }

    #[tokio::test]
    async fn test_seeded_website_stats() {
        let store = MemoryStore::new();
        seed_sample_data(&store).await.unwrap();

        let demo = store
            .find_organization_by_slug("demo-org")
            .await
            .unwrap()
            .unwrap();
        let website = store
            .list_projects(&demo.id)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == "Website Redesign")
            .unwrap();

        let stats = project_stats(&store, &website.id).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.todo, 1);
    }
}

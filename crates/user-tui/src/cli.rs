use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::form::{Submission, UserForm};
use crate::markup::{display_or_placeholder, render_users_page, sanitize_terminal};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show server health and database connection state
    Status,
    /// List users, newest first
    List,
    /// Show a single user
    Show { id: Uuid },
    /// Create a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Edit a user; omitted fields keep their current value
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user after confirmation
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Render the user list as a standalone HTML page
    ExportHtml {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Runs one non-interactive command. `input` is only read for confirmations.
pub async fn run<W: Write, R: BufRead>(
    command: Command,
    api: &ApiClient,
    out: &mut W,
    input: &mut R,
) -> Result<()> {
    match command {
        Command::Status => {
            let health = api.health().await?;
            let state = api.db_state().await?;
            writeln!(out, "status:     {}", health.status)?;
            writeln!(out, "readyState: {}", state.ready_state)?;
            writeln!(out, "database:   {}", state.uri)?;
        }
        Command::List => {
            let users = api.list_users().await?;
            if users.is_empty() {
                writeln!(out, "No users yet.")?;
            }
            for user in &users {
                writeln!(
                    out,
                    "{}  {}  <{}>",
                    user.id,
                    sanitize_terminal(display_or_placeholder(&user.name)),
                    sanitize_terminal(display_or_placeholder(&user.email)),
                )?;
            }
        }
        Command::Show { id } => {
            let user = api.get_user(id).await?;
            writeln!(out, "id:        {}", user.id)?;
            writeln!(out, "name:      {}", sanitize_terminal(&user.name))?;
            writeln!(out, "email:     {}", sanitize_terminal(&user.email))?;
            writeln!(out, "createdAt: {}", user.created_at.to_rfc3339())?;
            writeln!(out, "updatedAt: {}", user.updated_at.to_rfc3339())?;
        }
        Command::Add { name, email } => {
            let form = UserForm {
                name,
                email,
                ..UserForm::default()
            };
            let user = save(api, form).await?;
            writeln!(out, "Saved {}", user)?;
        }
        Command::Edit { id, name, email } => {
            let current = api.get_user(id).await?;
            let mut form = UserForm::new();
            form.start_edit(&current);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            let user = save(api, form).await?;
            writeln!(out, "Saved {}", user)?;
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm("Delete this user?", out, input)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            api.delete_user(id).await?;
            writeln!(out, "Deleted {}", id)?;
        }
        Command::ExportHtml { output } => {
            let page = render_users_page(&api.list_users().await?);
            match output {
                Some(path) => {
                    std::fs::write(&path, page)
                        .with_context(|| format!("Could not write {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => out.write_all(page.as_bytes())?,
            }
        }
    }

    Ok(())
}

/// Submits the form and returns the saved user's id.
async fn save(api: &ApiClient, form: UserForm) -> Result<Uuid> {
    let submission = form.submission().map_err(|message| anyhow!(message))?;
    let user = match submission {
        Submission::Create(req) => api.create_user(&req).await?,
        Submission::Update { id, req } => api.update_user(id, &req).await?,
    };
    tracing::debug!(user_id = %user.id, "Saved user");
    Ok(user.id)
}

fn confirm<W: Write, R: BufRead>(prompt: &str, out: &mut W, input: &mut R) -> Result<bool> {
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        bail!("No confirmation given");
    }
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

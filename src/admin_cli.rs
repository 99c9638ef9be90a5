// src/admin_cli.rs
use crate::database::{DatabaseConfig, RecruiterRepository};
use crate::utils::normalize_email;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Args)]
#[command(about = "Manage recruiter accounts for the CRM")]
pub struct RecruiterCli {
    #[command(subcommand)]
    pub command: RecruiterCommand,

    #[arg(long, default_value = "data/candi.db")]
    pub database_path: PathBuf,
}

#[derive(Subcommand)]
pub enum RecruiterCommand {
    /// Add a new recruiter account
    Add {
        email: String,
        display_name: Option<String>,
    },
    /// Deactivate a recruiter by email
    Remove { email: String },
    /// List all active recruiters
    List,
    /// Check whether an email has an active account
    Check { email: String },
    /// Import recruiters from a CSV file (email,display_name)
    Import { csv_file: PathBuf },
    /// Initialize the database
    Init,
}

pub async fn handle_recruiter_command(cli: RecruiterCli) -> Result<()> {
    let mut db_config = DatabaseConfig::new(cli.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;

    let pool = db_config.pool()?;
    let recruiters = RecruiterRepository::new(pool);

    match cli.command {
        RecruiterCommand::Add {
            email,
            display_name,
        } => {
            let email = normalize_email(&email);
            match recruiters.create(&email, display_name.as_deref()).await {
                Ok(recruiter) => {
                    info!("Recruiter created successfully:");
                    info!("   Email: {}", recruiter.email);
                    info!("   ID: {}", recruiter.id);
                }
                Err(e) => {
                    if e.to_string().contains("UNIQUE constraint failed") {
                        error!("Email '{}' already exists", email);
                    } else {
                        error!("Failed to create recruiter: {}", e);
                    }
                }
            }
        }

        RecruiterCommand::Remove { email } => {
            let email = normalize_email(&email);
            match recruiters.deactivate(&email).await {
                Ok(true) => {
                    info!("Recruiter deactivated for email: {}", email);
                }
                Ok(false) => {
                    info!("No active recruiter found for email: {}", email);
                }
                Err(e) => {
                    error!("Failed to deactivate recruiter: {}", e);
                }
            }
        }

        RecruiterCommand::List => match recruiters.list_active().await {
            Ok(list) => {
                if list.is_empty() {
                    info!("No active recruiters found.");
                } else {
                    info!("Active recruiters:");
                    info!("{:<5} {:<30} {:<25} {:<20}", "ID", "Email", "Name", "Created");
                    info!("{}", "-".repeat(80));

                    for recruiter in list {
                        info!(
                            "{:<5} {:<30} {:<25} {:<20}",
                            recruiter.id,
                            recruiter.email,
                            recruiter.display_name.as_deref().unwrap_or("-"),
                            recruiter.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Err(e) => {
                error!("Failed to list recruiters: {}", e);
            }
        },

        RecruiterCommand::Check { email } => {
            let email = normalize_email(&email);
            match recruiters.find_by_email(&email).await {
                Ok(Some(recruiter)) => {
                    info!("Email '{}' has an active account (ID {})", email, recruiter.id);
                    info!(
                        "   Created: {}",
                        recruiter.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
                Ok(None) => {
                    info!("Email '{}' has no active account", email);
                }
                Err(e) => {
                    error!("Failed to check email: {}", e);
                }
            }
        }

        RecruiterCommand::Import { csv_file } => {
            if !csv_file.exists() {
                error!("CSV file not found: {}", csv_file.display());
                return Ok(());
            }

            let content = tokio::fs::read_to_string(&csv_file).await?;
            let mut reader = csv::Reader::from_reader(content.as_bytes());

            let mut success_count = 0;
            let mut error_count = 0;

            for result in reader.records() {
                match result {
                    Ok(record) => {
                        let email = record.get(0).unwrap_or("").trim();
                        let display_name = record.get(1).map(str::trim).filter(|n| !n.is_empty());

                        if email.is_empty() {
                            error_count += 1;
                            info!("Skipping record with empty email");
                            continue;
                        }

                        let email = normalize_email(email);
                        match recruiters.create(&email, display_name).await {
                            Ok(_) => {
                                success_count += 1;
                                info!("Added: {}", email);
                            }
                            Err(e) => {
                                error_count += 1;
                                if e.to_string().contains("UNIQUE constraint failed") {
                                    info!("Skipped (already exists): {}", email);
                                } else {
                                    error!("Failed to add {}: {}", email, e);
                                }
                            }
                        }
                    }
                    Err(e) => {
                        error_count += 1;
                        error!("CSV parsing error: {}", e);
                    }
                }
            }

            info!("Import completed: {} added, {} errors", success_count, error_count);
        }

        RecruiterCommand::Init => {
            info!("Database initialized at: {}", cli.database_path.display());
            info!("Tables created: recruiters, candidates, projects, tasks, notes, calendar_events, kpi_events");
        }
    }

    Ok(())
}

//! MediVault desktop client.
//!
//! Command-line client for the MediVault patient portal: login and
//! registration, report upload, and listing/downloading/deleting
//! uploaded medical reports. All network traffic goes through the
//! authenticated API client in `api`; the CLI layer owns presentation
//! (messages, prompts, tables).

mod api;
mod error;
mod session;
mod validate;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use api::client::ApiClient;
use api::types::SignupRequest;
use api::{auth, documents};
use error::PortalError;
use session::store::KeyringStore;
use session::watcher::TokenWatcher;
use session::{Session, SessionEvent};

/// Portal base URL when MEDIVAULT_API_URL is not set.
const DEFAULT_API_URL: &str = "http://localhost:8081";

#[derive(Parser, Debug)]
#[command(
    name = "medivault-desktop",
    about = "Desktop client for the MediVault patient portal"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with portal credentials
    Login {
        #[arg(long, required_unless_present = "guest")]
        email: Option<String>,
        #[arg(long, required_unless_present = "guest")]
        password: Option<String>,
        /// Use the shared demo account instead of real credentials
        #[arg(long)]
        guest: bool,
    },
    /// Create a portal account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        pincode: String,
    },
    /// Show the logged-in user's profile
    Whoami,
    /// Upload one or more report files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List uploaded reports
    List,
    /// Download a report and save it locally
    Download {
        id: u64,
        /// File name to save as (defaults to the name on record)
        #[arg(long)]
        name: Option<String>,
        /// Directory to save into (defaults to the downloads folder)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Delete an uploaded report
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Clear the stored session token
    Logout,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args = Args::parse();

    let api_base_url =
        std::env::var("MEDIVAULT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    log::info!("MediVault desktop client starting (portal: {})", api_base_url);

    let session = Arc::new(Session::new(Box::new(KeyringStore::new())));
    let api = Arc::new(ApiClient::new(&api_base_url, session.clone()));

    // React to session signals the way the web client's shell does: log
    // token changes, tell the user how to get back in when the session ends.
    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::TokenChanged => log::info!("Session token changed"),
                SessionEvent::ReturnToLogin => {
                    log::info!("Returning to login entry point");
                }
            }
        }
    });

    // Watch the durable token slot for changes made by other client
    // instances while this command runs.
    let (_check_tx, check_rx) = tokio::sync::mpsc::channel(1);
    let mut watcher = TokenWatcher::new(session.clone(), check_rx);
    tokio::spawn(async move { watcher.run().await });

    if let Err(err) = run(&api, args.command).await {
        report_error(&err);
        std::process::exit(1);
    }
}

async fn run(api: &ApiClient, command: Command) -> Result<(), PortalError> {
    match command {
        Command::Login {
            email,
            password,
            guest,
        } => {
            let (status, body) = if guest {
                auth::login_guest(api).await?
            } else {
                let (email, password) = match (email, password) {
                    (Some(e), Some(p)) => (e, p),
                    _ => return Err(PortalError::Validation("Email and password are required".into())),
                };
                validate::validate_login(&email, &password)?;
                auth::login(api, &email, &password).await?
            };

            if status.is_success() {
                println!("{}", body.message.as_deref().unwrap_or("Login successful."));
            } else {
                return Err(PortalError::Api(body.message.unwrap_or_else(|| {
                    "Login failed. Please check your credentials.".to_string()
                })));
            }
        }

        Command::Register {
            name,
            email,
            password,
            phone,
            city,
            state,
            country,
            pincode,
        } => {
            let profile = SignupRequest {
                name,
                email,
                password,
                phone,
                city,
                state,
                country,
                pincode,
            };
            validate::validate_signup(&profile)?;
            let (status, body) = auth::register(api, &profile).await?;

            if status.is_success() {
                println!(
                    "{}",
                    body.message.as_deref().unwrap_or("Registration successful.")
                );
            } else {
                return Err(PortalError::Api(body.message.unwrap_or_else(|| {
                    "Registration failed. Please try again.".to_string()
                })));
            }
        }

        Command::Whoami => {
            require_login(api)?;
            let profile = auth::current_user(api).await?;
            println!("Name:    {}", profile.name);
            println!("Email:   {}", profile.email);
            println!("Phone:   {}", profile.phone);
            println!(
                "Address: {}, {}, {} {}",
                profile.city, profile.state, profile.country, profile.pincode
            );
        }

        Command::Upload { files } => {
            require_login(api)?;
            let resp = documents::upload(api, &files).await?;
            println!(
                "{}",
                resp.message
                    .as_deref()
                    .unwrap_or("File uploaded successfully")
            );
        }

        Command::List => {
            require_login(api)?;
            let reports = documents::list(api).await?;
            if reports.is_empty() {
                println!("No reports uploaded yet.");
                return Ok(());
            }

            println!("{:<6} {:<40} {:>10}  {}", "ID", "FILE", "SIZE", "UPLOADED");
            for report in &reports {
                println!(
                    "{:<6} {:<40} {:>10}  {}",
                    report.id,
                    truncate_file_name(&report.file_name, 40),
                    format_file_size(report.file_size),
                    report
                        .upload_date
                        .as_ref()
                        .map(|d| d.display())
                        .unwrap_or_default()
                );
            }
            let total: u64 = reports.iter().map(|r| r.file_size).sum();
            println!("{} file(s), {} total", reports.len(), format_file_size(total));
        }

        Command::Download { id, name, dir } => {
            require_login(api)?;
            let file_name = match name {
                Some(name) => name,
                // Resolve the recorded file name from the listing.
                None => documents::list(api)
                    .await?
                    .into_iter()
                    .find(|r| r.id == id)
                    .map(|r| r.file_name)
                    .unwrap_or_default(),
            };
            let dir = dir.unwrap_or_else(|| {
                dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
            });
            let path = documents::download_and_save(api, id, &file_name, &dir).await?;
            println!("Saved {}", path.display());
        }

        Command::Delete { id, yes } => {
            require_login(api)?;
            if !yes && !confirm(&format!("Delete report {}?", id))? {
                println!("Cancelled.");
                return Ok(());
            }
            let message = documents::delete(api, id).await?;
            if message.trim().is_empty() {
                println!("File deleted successfully.");
            } else {
                println!("{}", message);
            }
        }

        Command::Logout => {
            api.session().logout()?;
            println!("Logged out.");
        }
    }

    Ok(())
}

/// Authenticated pages bounce to login when no token is stored; the CLI
/// equivalent is refusing the command before any request goes out.
fn require_login(api: &ApiClient) -> Result<(), PortalError> {
    if api.session().is_authenticated() {
        Ok(())
    } else {
        Err(PortalError::Authentication)
    }
}

fn confirm(prompt: &str) -> Result<bool, PortalError> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

fn report_error(err: &PortalError) {
    match err {
        PortalError::Network(e) => {
            eprintln!("Network error. Please check your connection and try again. ({})", e)
        }
        PortalError::Authentication => {
            eprintln!("{} Run `medivault-desktop login`.", err)
        }
        other => eprintln!("{}", other),
    }
}

fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

fn truncate_file_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let head: String = name.chars().take(max).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_truncate_file_name() {
        assert_eq!(truncate_file_name("scan.pdf", 25), "scan.pdf");
        let long = "a-very-long-medical-report-file-name.pdf";
        let truncated = truncate_file_name(long, 25);
        assert_eq!(truncated.chars().count(), 28);
        assert!(truncated.ends_with("..."));
    }
}

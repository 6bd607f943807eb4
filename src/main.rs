use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::Password;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use spicy_client::api;
use spicy_client::config::{CliArgs, ClientConfig};
use spicy_client::error::ApiError;
use spicy_client::http_client::ApiHttpClient;
use spicy_client::models::auth::{SignupForm, UserRole};
use spicy_client::models::order::OrderStatus;
use spicy_client::models::settlement::YearMonth;
use spicy_client::router::{Navigator, Router, RouterNavigator};
use spicy_client::session::{FileSessionStore, SessionManager};

/// Spicy back office - command-line API client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the issued tokens
    Login {
        login_id: String,
        /// Prompted for when omitted
        #[arg(long, env = "SPICY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Revoke the stored refresh token and forget both tokens
    Logout,
    /// Register a new account
    Signup {
        login_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// HQ or FRANCHISE
        #[arg(long)]
        role: Option<UserRole>,
        /// Required by the backend for HQ accounts
        #[arg(long, env = "SPICY_ADMIN_TOKEN", hide_env_values = true)]
        admin_token: Option<String>,
    },
    /// Show the logged-in user
    Me,
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },
    Orders {
        #[command(subcommand)]
        command: OrderCommand,
    },
    Settlement {
        #[command(subcommand)]
        command: SettlementCommand,
    },
    /// Check whether a product needs reordering
    Demand { product_id: i64 },
    /// Print the route table, or resolve one path
    Routes { path: Option<String> },
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    List,
    Get { id: i64 },
    Search { name: String },
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    List {
        #[arg(long)]
        store_id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum OrderCommand {
    List {
        #[arg(long)]
        store_id: i64,
        #[arg(long, default_value = "PENDING")]
        status: OrderStatus,
    },
    Details {
        #[arg(long)]
        store_id: i64,
        order_id: i64,
    },
    Cancel {
        #[arg(long)]
        store_id: i64,
        order_id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum SettlementCommand {
    Daily {
        #[arg(long)]
        store_id: i64,
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    Monthly {
        #[arg(long)]
        store_id: i64,
        /// YYYY-MM
        year_month: YearMonth,
    },
    /// Save the monthly statement PDF
    Download {
        #[arg(long)]
        store_id: i64,
        year_month: YearMonth,
        /// Directory to write into
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
}

impl Command {
    /// Page the command stands in for; a rejected session redirects from here
    fn location(&self) -> &'static str {
        match self {
            Command::Login { .. } => "/login",
            Command::Signup { .. } => "/signup",
            Command::Logout | Command::Me => "/mypage",
            Command::Inventory { .. } | Command::Demand { .. } => "/inventory",
            Command::Cart { .. } => "/cart",
            Command::Orders { .. } => "/orders",
            Command::Settlement { .. } => "/settlements",
            Command::Routes { .. } => "/",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = ClientConfig::load(&cli.args)?;
    config.validate()?;

    // Initialize logging with a configured level; stdout carries the JSON output
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(
        base_url = %config.base_url,
        timeout_secs = config.request_timeout_secs,
        session_file = %config.session_file.display(),
        "Configuration loaded"
    );

    let navigator = Arc::new(RouterNavigator::new(
        Router::standard(),
        cli.command.location(),
    ));
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let session = Arc::new(SessionManager::new(store, navigator.clone()));
    let client = ApiHttpClient::from_config(&config, session)?;

    let result = run(&client, &navigator, cli.command).await;

    if let Some(api_error) = result.as_ref().err().and_then(|e| e.downcast_ref::<ApiError>()) {
        tracing::error!(
            kind = api_error.kind(),
            status = ?api_error.status(),
            "❌ Command failed"
        );
    }

    for notice in navigator.notices() {
        eprintln!("⚠️  {}", notice);
    }
    if client.session().is_redirecting() {
        eprintln!("🔑 Log in again with: spicy-client login <LOGIN_ID>");
    }

    result
}

async fn run(client: &ApiHttpClient, navigator: &RouterNavigator, command: Command) -> Result<()> {
    match command {
        Command::Login { login_id, password } => {
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };

            api::auth::login(client, &login_id, &password)
                .await
                .context("Login failed")?;
            navigator.navigate("/");
            eprintln!("✅ Logged in as {}", login_id);
        }

        Command::Logout => {
            let envelope = api::auth::logout(client, None).await.context("Logout failed")?;
            print_json(&envelope)?;
        }

        Command::Signup {
            login_id,
            name,
            email,
            role,
            admin_token,
        } => {
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .context("Failed to read password")?;

            let form = SignupForm {
                login_id,
                password,
                name,
                email,
                user_role: role,
                admin_token,
            };
            let envelope = api::auth::signup(client, &form).await.context("Signup failed")?;
            print_json(&envelope)?;
        }

        Command::Me => print_json(&api::user::get_me(client).await?)?,

        Command::Inventory { command } => match command {
            InventoryCommand::List => print_json(&api::inventory::list_products(client).await?)?,
            InventoryCommand::Get { id } => {
                print_json(&api::inventory::get_product(client, id).await?)?
            }
            InventoryCommand::Search { name } => {
                print_json(&api::inventory::search_by_name(client, &name).await?)?
            }
        },

        Command::Cart { command } => match command {
            CartCommand::List { store_id } => {
                print_json(&api::cart::list_items(client, store_id).await?)?
            }
        },

        Command::Orders { command } => match command {
            OrderCommand::List { store_id, status } => {
                print_json(&api::order::list(client, store_id, status).await?)?
            }
            OrderCommand::Details { store_id, order_id } => {
                print_json(&api::order::details(client, store_id, order_id).await?)?
            }
            OrderCommand::Cancel { store_id, order_id } => {
                let envelope = api::order::cancel(client, store_id, order_id)
                    .await
                    .with_context(|| format!("Failed to cancel order {}", order_id))?;
                print_json(&envelope)?;
            }
        },

        Command::Settlement { command } => match command {
            SettlementCommand::Daily { store_id, date } => {
                print_json(&api::settlement::daily(client, store_id, date).await?)?
            }
            SettlementCommand::Monthly {
                store_id,
                year_month,
            } => print_json(&api::settlement::monthly(client, store_id, year_month).await?)?,
            SettlementCommand::Download {
                store_id,
                year_month,
                output,
            } => {
                let pdf = api::settlement::download_monthly_pdf(client, store_id, year_month)
                    .await
                    .context("Failed to download settlement statement")?;
                let path = output.join(&pdf.file_name);
                tokio::fs::write(&path, &pdf.bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("✅ Saved {} ({} bytes)", path.display(), pdf.bytes.len());
            }
        },

        Command::Demand { product_id } => {
            print_json(&api::demand::check(client, product_id).await?)?
        }

        Command::Routes { path } => match path {
            Some(path) => {
                let resolved = navigator.router().resolve(&path)?;
                print_json(&serde_json::json!({
                    "path": resolved.path,
                    "name": resolved.route.name,
                    "params": resolved.params,
                    "requiresAuth": resolved.route.requires_auth,
                    "roles": resolved.route.roles,
                }))?;
            }
            None => {
                for route in navigator.router().routes() {
                    let access = match (route.redirect, route.requires_auth) {
                        (Some(target), _) => format!("-> {}", target),
                        (None, false) => "public".to_string(),
                        (None, true) if route.roles.is_empty() => "auth".to_string(),
                        (None, true) => format!(
                            "auth [{}]",
                            route
                                .roles
                                .iter()
                                .map(UserRole::as_str)
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    };
                    println!("{:<20} {:<14} {}", route.path, route.name, access);
                }
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}

use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use locator::api::{set_silent, XanoClient};
use locator::config::{self, AppConfig, DEFAULT_HOST, DEFAULT_PORT};
use locator::geo::{covered_cities, fit_bounds, Position};
use locator::models::{AppState, Role};
use locator::routes::build_router;
use locator::services::{
    add_user, deactivate_user, load_users_from_file, persist_users_file, reset_password, UserMap,
};

async fn build_state(config: &AppConfig) -> AppState {
    match AppState::build(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(%e, "Failed to initialise application state");
            eprintln!("{}: {}", "Failed to initialise application state".red(), e);
            process::exit(1);
        }
    }
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", "Failed to read custom stylesheet at".red(), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", "Invalid host/port format".red(), e);
            process::exit(1);
        }
    };
    tracing::info!(%addr, backend = %state.units.backend().describe(), "Starting locator server");
    let app = build_router(state);
    println!(
        "{} {}",
        "Web server running on".green(),
        format!("http://{}", addr).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", "Server error".red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                format!("Failed to bind to {}", addr).red(),
                e,
                "Stop the process using this port or pass a different --port value.".yellow()
            );
            process::exit(1);
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn json_value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Prints a JSON object as a two-column field/value table.
fn print_object(value: &serde_json::Value) {
    let Some(obj) = value.as_object() else {
        println!("{}", json_value_to_string(value));
        return;
    };
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (k, v) in obj {
        table.add_row(vec![k.clone(), json_value_to_string(v)]);
    }
    println!("\n{table}\n");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message.to_string().red());
    process::exit(1);
}

fn parse_point(raw: &str) -> Result<Position, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("'{}' is not in lat,lng form", raw))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude in '{}'", raw))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude in '{}'", raw))?;
    let p = Position::new(lat, lng);
    if !p.is_valid() {
        return Err(format!("'{}' is outside valid coordinate ranges", raw));
    }
    Ok(p)
}

#[derive(Parser)]
#[command(
    name = "locator",
    author,
    version,
    about = "Dealer and unit locator for Brazilian service networks",
    long_about = r#"Serves the public coverage map and the admin panel, and offers a few
maintenance commands for units, users and configuration.

Examples:
  1) Run the web server:
      locator serve --host 0.0.0.0 --port 8080
  2) Check which catalog cities a radius reaches:
      locator coverage -20.7246 -48.5681 200
  3) Manage admin users:
      locator users add maria s3cret --role manager
"#,
    after_help = "Use `locator <subcommand> --help` for subcommand options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable backend request logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and backend connectivity
    #[command(long_about = "Report every missing XANO setting and, when XANO is enabled, fetch the unit list once to confirm the token works.")]
    CheckConfig,
    /// Inspect and manage units
    Units {
        #[command(subcommand)]
        sub: UnitCommands,
    },
    /// List catalog cities within a radius of a point
    Coverage {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        /// Radius in km; omitted or non-positive yields no cities
        radius: Option<f64>,
    },
    /// Compute the map viewport that frames a set of points
    Fit {
        /// Points as "lat,lng"
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,
    },
    /// Manage admin users (users.json)
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[derive(Subcommand)]
enum UnitCommands {
    #[command(about = "List all units")]
    List,
    #[command(about = "Show one unit with its covered cities")]
    Show { id: i64 },
    #[command(about = "Delete a unit")]
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(about = "List users")]
    List,
    #[command(about = "Add a user", long_about = "Add a user with a role (admin|manager|operator). The password is hashed before it is saved.")]
    Add {
        username: String,
        password: String,
        #[arg(long, default_value = "operator")]
        role: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    #[command(about = "Reset a user's password")]
    ResetPassword { username: String, password: String },
    #[command(about = "Deactivate a user and close their sessions")]
    Deactivate { username: String },
}

async fn load_users(config: &AppConfig) -> UserMap {
    match load_users_from_file(&config.users_path()).await {
        Ok(users) => users,
        Err(e) => fail(format!("Failed to load users.json: {}", e)),
    }
}

async fn save_users(users: &UserMap, config: &AppConfig) {
    if let Err(e) = persist_users_file(users, &config.users_path()).await {
        fail(format!("Failed to persist users.json: {}", e));
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::disable();
    }
    if cli.silent {
        set_silent(true);
    }

    config::load_env_file(cli.env_file.as_deref());
    let app_config = AppConfig::from_env();

    let Some(command) = cli.command else {
        let state = build_state(&app_config).await;
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };

    match command {
        Commands::Serve {
            host,
            port,
            stylesheet,
        } => {
            let state = build_state(&app_config).await;
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig => {
            let xano = &app_config.xano;
            println!("{} {}", "Data directory:".bold(), app_config.data_dir.display());
            if !xano.enabled {
                println!("{}", "XANO disabled; units are stored in units.json".yellow());
                return;
            }
            let problems = xano.validate();
            if !problems.is_empty() {
                for p in &problems {
                    eprintln!("{} {}", "✗".red(), p);
                }
                process::exit(1);
            }
            let client = match XanoClient::new(reqwest::Client::new(), xano) {
                Ok(c) => c,
                Err(e) => fail(e),
            };
            match client.get_units().await {
                Ok(units) => println!(
                    "{} ({} units at {})",
                    "Configuration looks valid".green(),
                    units.len(),
                    client.base_url()
                ),
                Err(e) => fail(format!("Configuration appears invalid: {}", e)),
            }
        }
        Commands::Units { sub } => {
            let state = build_state(&app_config).await;
            match sub {
                UnitCommands::List => {
                    let units = state.units.list();
                    if units.is_empty() {
                        println!("(no units)");
                        return;
                    }
                    let mut table = new_table();
                    table.set_header(vec!["ID", "Name", "Type", "City", "UF", "Radius km", "Cities"]);
                    for u in &units {
                        table.add_row(vec![
                            u.id.to_string(),
                            u.name.clone(),
                            u.kind.as_str().to_string(),
                            u.city.clone().unwrap_or_default(),
                            u.state.clone().unwrap_or_default(),
                            u.coverage_radius.map(|r| r.to_string()).unwrap_or_default(),
                            u.covered_cities.len().to_string(),
                        ]);
                    }
                    println!("\n{table}\n");
                }
                UnitCommands::Show { id } => {
                    let Some(unit) = state.units.get(id) else {
                        fail(format!("Unit {} not found", id));
                    };
                    match serde_json::to_value(&unit) {
                        Ok(v) => print_object(&v),
                        Err(e) => fail(e),
                    }
                }
                UnitCommands::Delete { id } => match state.units.delete(id).await {
                    Ok(()) => println!("{} {} {}", "Unit".green(), id, "deleted".green()),
                    Err(e) => fail(format!("Failed to delete unit {}: {}", id, e)),
                },
            }
        }
        Commands::Coverage { lat, lng, radius } => {
            let center = Position::new(lat, lng);
            if !center.is_valid() {
                fail("lat must be in [-90, 90] and lng in [-180, 180]");
            }
            let cities = covered_cities(center, radius);
            if cities.is_empty() {
                println!("{}", "No catalog city within the radius".yellow());
                return;
            }
            let mut table = new_table();
            table.set_header(vec!["Covered city"]);
            for c in &cities {
                table.add_row(vec![c.clone()]);
            }
            println!("\n{table}\n{} cities", cities.len());
        }
        Commands::Fit { points } => {
            let positions: Vec<Position> = match points.iter().map(|p| parse_point(p)).collect() {
                Ok(p) => p,
                Err(e) => fail(e),
            };
            let fit = fit_bounds(&positions);
            println!(
                "{} {:.4}, {:.4}  {} {}",
                "center".bold(),
                fit.center.lat,
                fit.center.lng,
                "zoom".bold(),
                fit.zoom
            );
        }
        Commands::Users { sub } => {
            let users = load_users(&app_config).await;
            match sub {
                UserCommands::List => {
                    let users = users.lock().unwrap();
                    let mut names: Vec<&String> = users.keys().collect();
                    names.sort();
                    let mut table = new_table();
                    table.set_header(vec!["Username", "Name", "Role", "Active", "Last login"]);
                    for u in names {
                        let rec = &users[u];
                        table.add_row(vec![
                            u.clone(),
                            rec.name.clone(),
                            rec.role.as_str().to_string(),
                            if rec.active { "yes" } else { "no" }.to_string(),
                            rec.last_login.clone().unwrap_or_default(),
                        ]);
                    }
                    println!("\n{table}\n");
                }
                UserCommands::Add {
                    username,
                    password,
                    role,
                    name,
                    email,
                } => {
                    let Some(role) = Role::parse(&role) else {
                        fail(format!("Unknown role '{}' (admin|manager|operator)", role));
                    };
                    if let Err(e) = add_user(&users, &username, &password, role, &name, &email) {
                        fail(e);
                    }
                    save_users(&users, &app_config).await;
                    println!("{} '{}' {}", "User".green(), username.trim().to_lowercase(), "added".green());
                }
                UserCommands::ResetPassword { username, password } => {
                    if let Err(e) = reset_password(&users, &username, &password) {
                        fail(e);
                    }
                    save_users(&users, &app_config).await;
                    println!("{} '{}' {}", "Password for".green(), username.trim().to_lowercase(), "updated".green());
                }
                UserCommands::Deactivate { username } => {
                    if let Err(e) = deactivate_user(&users, &username) {
                        fail(e);
                    }
                    save_users(&users, &app_config).await;
                    println!("{} '{}' {}", "User".green(), username.trim().to_lowercase(), "deactivated".green());
                }
            }
        }
    }
}

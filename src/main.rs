use clap::{Parser, Subcommand};
use badge_scorer::{
    models::{BadgeResult, MetricSet, Role},
    scoring::{BadgeCalculator, BadgeScheme},
    session::{RoleGuard, Session, SessionStore},
    config::Settings,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "badge-scorer")]
#[clap(about = "Score marketplace service providers into performance badges", long_about = None)]
struct Cli {
    /// Settings file (defaults to config/default and config/local)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the badge for a single participant
    Score {
        /// Role to score as (handyman, homerunner)
        #[clap(short, long)]
        role: String,

        /// Participant ID
        #[clap(short, long, default_value = "anonymous")]
        participant: String,

        /// Metric value as name=value, repeatable
        #[clap(short, long = "metric")]
        metrics: Vec<String>,

        /// JSON object of metric values
        #[clap(long)]
        metrics_file: Option<PathBuf>,

        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// List the tiers and thresholds for a role
    Tiers {
        #[clap(short, long)]
        role: String,
    },

    /// Start a session
    Login {
        #[clap(short, long)]
        user_id: String,

        /// Comma separated roles, the first becomes active
        #[clap(short, long)]
        roles: String,
    },

    /// Act as another held role
    SwitchRole { role: String },

    /// Show the current session
    Whoami,

    /// End the current session
    Logout,

    /// Check whether the active role may pass a guard
    Access {
        /// Comma separated roles the guard allows
        #[clap(short, long)]
        allow: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new().unwrap_or_else(|e| {
            eprintln!("Using default settings: {}", e);
            Settings::default()
        }),
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Validate settings
    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(e.into());
    }

    let store = SessionStore::new(&settings.session.store_path);

    match cli.command {
        Commands::Score { role, participant, metrics, metrics_file, json } => {
            let role = parse_role(&role)?;

            let mut metric_set = MetricSet::new();
            if let Some(path) = metrics_file {
                let raw = std::fs::read_to_string(&path)?;
                metric_set = serde_json::from_str(&raw)?;
                info!("Loaded {} metrics from {}", metric_set.len(), path.display());
            }
            metric_set.merge(&MetricSet::from_pairs(metrics.as_slice())?);

            let calculator = BadgeCalculator::new(settings);
            let report = calculator.report(&participant, role, &metric_set)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n=== {} Badge ===", capitalize(role.as_str()));
                println!("Participant: {}", report.participant_id);
                print_badge(&report.badge);
                println!("\nCalculated at: {}", report.calculated_at);
            }
        }

        Commands::Tiers { role } => {
            let role = parse_role(&role)?;
            let scheme = BadgeCalculator::new(settings).scheme_for(role)?;
            print_scheme(role, &scheme);
        }

        Commands::Login { user_id, roles } => {
            let roles = Role::parse_list(&roles)?;
            let session = Session::new(user_id, roles)?;
            store.persist(&session)?;
            println!("Signed in as {} ({})", session.user_id, session.active_role);
        }

        Commands::SwitchRole { role } => {
            let role = parse_role(&role)?;
            let mut session = store.hydrate()?.ok_or(badge_scorer::BadgeScoreError::NotSignedIn)?;
            session.switch_role(role)?;
            store.persist(&session)?;
            println!("Now acting as {}", session.active_role);
        }

        Commands::Whoami => match store.hydrate()? {
            Some(session) => {
                let roles: Vec<&str> = session.roles.iter().map(Role::as_str).collect();
                println!("User: {}", session.user_id);
                println!("Active role: {}", session.active_role);
                println!("Roles: {}", roles.join(", "));
                println!("Signed in at: {}", session.signed_in_at);
            }
            None => println!("Not signed in"),
        },

        Commands::Logout => {
            store.logout()?;
            println!("Signed out");
        }

        Commands::Access { allow } => {
            let guard = RoleGuard::new(Role::parse_list(&allow)?);
            match store.authorize(&guard) {
                Ok(role) => println!("✅ Access granted as {}", role),
                Err(e) => {
                    println!("❌ Access denied");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    Role::parse(s).ok_or_else(|| anyhow::anyhow!("Invalid role: {}", s))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_badge(badge: &BadgeResult) {
    println!("Tier: {} [{}]", badge.label, badge.class);
    println!("Score: {}/{}", badge.score, badge.total_possible);
    match &badge.next_tier {
        Some(next) => println!(
            "Next tier: {} ({} more points)",
            next.label,
            next.min_score.saturating_sub(badge.score)
        ),
        None => println!("🏆 Highest tier reached"),
    }

    println!("\nProgress:");
    for entry in &badge.progress {
        let unit = entry.unit.as_deref().unwrap_or("");
        let target = match entry.target {
            Some(t) => format!("next at {}{}", t, unit),
            None => "maxed".to_string(),
        };
        let mark = if entry.met { "✅" } else { "  " };
        println!(
            "  {} {:<24} {}{} ({}/{}, {})",
            mark, entry.label, entry.current, unit, entry.points, entry.max_points, target
        );
    }
}

fn print_scheme(role: Role, scheme: &BadgeScheme) {
    println!("\n=== {} Tiers ===", capitalize(role.as_str()));
    for tier in scheme.catalog().tiers() {
        println!("\n{} (min score {})", tier.label, tier.min_score);
        if !tier.description.is_empty() {
            println!("  {}", tier.description);
        }
        for requirement in &tier.requirements {
            println!("  - {}", requirement);
        }
    }

    println!("\nThresholds ({} points possible):", scheme.total_possible());
    for target in scheme.targets() {
        let values: Vec<String> = target.thresholds.as_slice().iter().map(|v| v.to_string()).collect();
        println!(
            "  {:<24} [{}] {}",
            target.metric,
            values.join(", "),
            target.unit.as_deref().unwrap_or("")
        );
    }
}

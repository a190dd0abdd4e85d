mod report;
mod stats;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use calio_core::input::{apply_settings_args, parse_food_input};
use calio_core::repository::FoodEntryRepository;
use calio_core::time::{now_millis, parse_when};
use calio_core::usecase::dashboard::build_dashboard;
use calio_core::{
    BodyProfile, ChangeNotifier, Config, DashboardUseCase, EntryService, FileEntryRepository,
    FileSettingsRepository, HistoryFilter, HistoryUseCase, MealType, SettingsService, Snapshot,
};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calio")]
#[command(about = "Food, water and calorie streak tracker", long_about = None)]
struct Cli {
    /// Directory holding the data files (defaults to $CALIO_DATA_DIR or ~/.calio)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log food, e.g. `add Oatmeal cal:350 pro:12 serving:"1 cup" meal:breakfast at:yesterday`
    Add {
        /// Food name followed by key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Log water in millilitres
    Water {
        amount: u32,
        /// When it was drunk (today, yesterday, -2d, 2025-01-31, "2025-01-31 08:30")
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete a food entry by id (a unique prefix is enough)
    Delete { id: String },
    /// Totals and entries for one day
    Today {
        #[arg(long)]
        date: Option<String>,
    },
    /// The last seven days
    Week,
    /// Streaks, weekly averages and insights
    Progress,
    /// BMI, BMR and TDEE from your settings
    Profile,
    /// Food entries grouped by day
    History {
        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        search: String,
        /// Only this meal type
        #[arg(long)]
        meal: Option<String>,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Open the interactive stats dashboard
    Stats,
}

#[derive(clap::Subcommand)]
enum SettingsAction {
    Show,
    /// usage: settings set cal:1800 weight:72.5 activity:light gender:female
    Set {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("calio=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_data_dir(cli.data_dir);
    init_tracing(&config.log_filter);
    debug!(data_dir = %config.data_dir.display(), "starting");

    let entry_repo = FileEntryRepository::new(Some(config.data_dir.clone()))?;
    let settings_repo = FileSettingsRepository::new(Some(config.data_dir.clone()))?;
    let now = now_millis();

    match cli.command {
        Some(Commands::Add { args }) => {
            let (input, at) = parse_food_input(&args, now)?;
            let service = EntryService::new(entry_repo.clone(), entry_repo.clone());
            let created = service.add_food_at(input, at.unwrap_or(now))?;
            report::print_food_added(&created);
        }
        Some(Commands::Water { amount, at }) => {
            let timestamp = match at {
                Some(when) => parse_when(&when, now)?,
                None => now,
            };
            let service = EntryService::new(entry_repo.clone(), entry_repo.clone());
            let created = service.add_water_at(amount, timestamp)?;
            println!("Water logged: {}ml (ID: {})", created.amount, created.id);
        }
        Some(Commands::Delete { id }) => {
            let full_id = resolve_entry_id(&entry_repo, &id)?;
            let service = EntryService::new(entry_repo.clone(), entry_repo.clone());
            if service.delete_food(&full_id)? {
                println!("Deleted entry {}", full_id);
            } else {
                println!("No entry with ID {}", full_id);
            }
        }
        Some(Commands::Today { date }) => {
            let instant = match date {
                Some(when) => parse_when(&when, now)?,
                None => now,
            };
            let snapshot = load_snapshot(&entry_repo, &settings_repo)?;
            report::print_day(&snapshot.daily(instant), &snapshot.settings);
        }
        Some(Commands::Week) => {
            let snapshot = load_snapshot(&entry_repo, &settings_repo)?;
            report::print_week(&snapshot.weekly(now));
        }
        Some(Commands::Progress) => {
            let snapshot = load_snapshot(&entry_repo, &settings_repo)?;
            let dashboard = build_dashboard(&snapshot, now);
            report::print_progress(&dashboard);
        }
        Some(Commands::Profile) => {
            let settings = SettingsService::new(settings_repo).settings()?;
            report::print_profile(&BodyProfile::from_settings(&settings), &settings);
        }
        Some(Commands::History { search, meal }) => {
            let meal_type = match meal {
                Some(m) => Some(
                    MealType::parse(&m).ok_or_else(|| anyhow!("Unknown meal type: '{}'", m))?,
                ),
                None => None,
            };
            let filter = HistoryFilter { search, meal_type };
            let groups = HistoryUseCase::new(&entry_repo).history(&filter)?;
            report::print_history(&groups);
        }
        Some(Commands::Settings { action }) => {
            let service = SettingsService::new(settings_repo);
            match action {
                Some(SettingsAction::Set { args }) => {
                    let updated = apply_settings_args(&args, &service.settings()?)?;
                    let saved = service.update(updated)?;
                    println!("Settings updated.");
                    report::print_settings(&saved);
                }
                Some(SettingsAction::Show) | None => report::print_settings(&service.settings()?),
            }
        }
        Some(Commands::Stats) | None => {
            let notifier = ChangeNotifier::new();
            stats::run(&entry_repo, &entry_repo, &settings_repo, &notifier)?;
        }
    }
    Ok(())
}

fn load_snapshot(
    entry_repo: &FileEntryRepository,
    settings_repo: &FileSettingsRepository,
) -> Result<Snapshot> {
    DashboardUseCase::new(entry_repo, entry_repo, settings_repo).snapshot()
}

/// Expands a unique id prefix (as shown in tables) to the full entry id.
fn resolve_entry_id<R: FoodEntryRepository>(repo: &R, prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(anyhow!("Entry ID cannot be empty"));
    }
    let matches: Vec<String> = repo
        .list()?
        .into_iter()
        .map(|e| e.id)
        .filter(|id| id.starts_with(prefix))
        .collect();

    match matches.len() {
        0 => Ok(prefix.to_string()),
        1 => Ok(matches[0].clone()),
        n => Err(anyhow!("ID prefix '{}' matches {} entries", prefix, n)),
    }
}

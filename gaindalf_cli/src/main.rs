use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gaindalf_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gaindalf")]
#[command(about = "Workout tracker with lift suggestions and progression indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage muscle groups
    #[command(subcommand)]
    MuscleGroup(MuscleGroupCommand),

    /// Manage lifts
    #[command(subcommand)]
    Lift(LiftCommand),

    /// Manage muscle group conflicts
    #[command(subcommand)]
    Conflict(ConflictCommand),

    /// Manage workouts and get suggestions
    #[command(subcommand)]
    Workout(WorkoutCommand),

    /// Log and edit sets
    #[command(subcommand)]
    Set(SetCommand),

    /// Show or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show progression indexes
    Progress {
        /// Show the history of a single lift instead of all workouts
        #[arg(long)]
        lift: Option<i64>,

        /// Also write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum MuscleGroupCommand {
    Add { name: String },
    List,
    Rename { id: i64, name: String },
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum LiftCommand {
    Add {
        name: String,
        /// Muscle group id (repeatable)
        #[arg(long = "group")]
        groups: Vec<i64>,
    },
    List,
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Replace muscle groups (repeatable)
        #[arg(long = "group")]
        groups: Vec<i64>,
        /// Remove all muscle groups from the lift
        #[arg(long, conflicts_with = "groups")]
        clear_groups: bool,
    },
    Remove { id: i64 },
    /// Sets from the most recent time this lift was done
    LastSets { id: i64 },
}

#[derive(Subcommand)]
enum ConflictCommand {
    Add { a: i64, b: i64 },
    List,
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// Start a workout (today unless --date is given)
    New {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        subtitle: String,
    },
    List,
    Show { id: i64 },
    Subtitle { id: i64, subtitle: String },
    Remove { id: i64 },
    AddLift {
        workout: i64,
        lift: i64,
        #[arg(long, default_value_t = 0)]
        order: i32,
    },
    RemoveLift { workout: i64, workout_lift: i64 },
    /// Suggest the next lift for a workout
    Suggest { id: i64 },
}

#[derive(Subcommand)]
enum SetCommand {
    Add {
        workout_lift: i64,
        #[arg(long)]
        reps: Option<i32>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        reps: Option<i32>,
        #[arg(long)]
        weight: Option<f64>,
    },
    Remove { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config decides the log level, so it loads under a temporary subscriber
    let mut config = gaindalf_core::logging::bootstrap(Config::load)?;
    gaindalf_core::logging::init_with_level(&config.logging.level);

    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let store = FileStore::new(config.data.database_path());
    tracing::debug!("Using database {:?}", store.path());

    match cli.command {
        Commands::MuscleGroup(cmd) => cmd_muscle_group(&store, cmd),
        Commands::Lift(cmd) => cmd_lift(&store, cmd),
        Commands::Conflict(cmd) => cmd_conflict(&store, cmd),
        Commands::Workout(cmd) => cmd_workout(&store, cmd),
        Commands::Set(cmd) => cmd_set(&store, cmd),
        Commands::Config(cmd) => cmd_config(&config, cmd),
        Commands::Progress { lift, csv } => cmd_progress(&store, lift, csv),
    }
}

fn cmd_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    let path = Config::default_config_path();
    match cmd {
        ConfigCommand::Show => {
            println!("Config file: {}", path.display());
            println!("Data dir:    {}", config.data.data_dir.display());
            println!("Database:    {}", config.database_path().display());
            println!("Log level:   {}", config.logging.level);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(Error::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save()?;
            println!("✓ Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn cmd_muscle_group(store: &FileStore, cmd: MuscleGroupCommand) -> Result<()> {
    match cmd {
        MuscleGroupCommand::Add { name } => {
            let group = store.update(|db| db.create_muscle_group(&name))?;
            println!("✓ Added muscle group {} ({})", group.id, group.name);
        }
        MuscleGroupCommand::List => {
            for group in store.load()?.muscle_groups()? {
                println!("{:>4}  {}", group.id, group.name);
            }
        }
        MuscleGroupCommand::Rename { id, name } => {
            let group = store.update(|db| db.rename_muscle_group(id, &name))?;
            println!("✓ Renamed muscle group {} to {}", group.id, group.name);
        }
        MuscleGroupCommand::Remove { id } => {
            store.update(|db| db.delete_muscle_group(id))?;
            println!("✓ Removed muscle group {}", id);
        }
    }
    Ok(())
}

fn cmd_lift(store: &FileStore, cmd: LiftCommand) -> Result<()> {
    match cmd {
        LiftCommand::Add { name, groups } => {
            let lift = store.update(|db| db.create_lift(&name, &groups))?;
            println!("✓ Added lift {} ({})", lift.id, lift.name);
        }
        LiftCommand::List => {
            for detail in store.load()?.lift_details() {
                println!(
                    "{:>4}  {}  groups: {:?}",
                    detail.lift.id, detail.lift.name, detail.muscle_group_ids
                );
            }
        }
        LiftCommand::Update {
            id,
            name,
            groups,
            clear_groups,
        } => {
            let muscle_group_ids = if clear_groups {
                Some(Vec::new())
            } else if groups.is_empty() {
                None
            } else {
                Some(groups)
            };
            let update = LiftUpdate {
                name,
                muscle_group_ids,
            };
            let lift = store.update(|db| db.update_lift(id, update))?;
            println!("✓ Updated lift {} ({})", lift.id, lift.name);
        }
        LiftCommand::Remove { id } => {
            store.update(|db| db.delete_lift(id))?;
            println!("✓ Removed lift {}", id);
        }
        LiftCommand::LastSets { id } => {
            let db = store.load()?;
            if db.lift(id)?.is_none() {
                return Err(Error::NotFound(format!("Lift {} not found", id)));
            }
            let sets = gaindalf_core::history::previous_sets(&db, id)?;
            if sets.is_empty() {
                println!("No previous sets for lift {}", id);
            }
            for set in &sets {
                println!("  {}", format_set(set));
            }
        }
    }
    Ok(())
}

fn cmd_conflict(store: &FileStore, cmd: ConflictCommand) -> Result<()> {
    match cmd {
        ConflictCommand::Add { a, b } => {
            let conflict = store.update(|db| db.create_conflict(a, b))?;
            println!(
                "✓ Added conflict {} between {} and {}",
                conflict.id, conflict.muscle_group_a_id, conflict.muscle_group_b_id
            );
        }
        ConflictCommand::List => {
            for detail in store.load()?.conflicts()? {
                println!(
                    "{:>4}  {} <-> {}",
                    detail.conflict.id, detail.muscle_group_a_name, detail.muscle_group_b_name
                );
            }
        }
        ConflictCommand::Remove { id } => {
            store.update(|db| db.delete_conflict(id))?;
            println!("✓ Removed conflict {}", id);
        }
    }
    Ok(())
}

fn cmd_workout(store: &FileStore, cmd: WorkoutCommand) -> Result<()> {
    match cmd {
        WorkoutCommand::New { date, subtitle } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let workout = store.update(|db| db.create_workout(date, &subtitle))?;
            println!("✓ Started workout {} on {}", workout.id, workout.date);
        }
        WorkoutCommand::List => {
            for summary in store.load()?.workout_summaries() {
                println!(
                    "{:>4}  {}  {}  [{}]",
                    summary.workout.id,
                    summary.workout.date,
                    summary.workout.subtitle,
                    summary.lift_names.join(", ")
                );
            }
        }
        WorkoutCommand::Show { id } => {
            display_workout(&store.load()?.workout_detail(id)?);
        }
        WorkoutCommand::Subtitle { id, subtitle } => {
            let workout = store.update(|db| db.set_workout_subtitle(id, &subtitle))?;
            println!("✓ Workout {} subtitle: {}", workout.id, workout.subtitle);
        }
        WorkoutCommand::Remove { id } => {
            store.update(|db| db.delete_workout(id))?;
            println!("✓ Removed workout {}", id);
        }
        WorkoutCommand::AddLift {
            workout,
            lift,
            order,
        } => {
            let workout_lift = store.update(|db| db.add_lift_to_workout(workout, lift, order))?;
            println!(
                "✓ Added lift {} to workout {} (workout lift {})",
                lift, workout, workout_lift.id
            );
        }
        WorkoutCommand::RemoveLift {
            workout,
            workout_lift,
        } => {
            store.update(|db| db.remove_workout_lift(workout, workout_lift))?;
            println!("✓ Removed workout lift {}", workout_lift);
        }
        WorkoutCommand::Suggest { id } => {
            let db = store.load()?;
            display_suggestion(&suggest(&db, id)?);
        }
    }
    Ok(())
}

fn cmd_set(store: &FileStore, cmd: SetCommand) -> Result<()> {
    match cmd {
        SetCommand::Add {
            workout_lift,
            reps,
            weight,
        } => {
            let set = store.update(|db| db.add_set(workout_lift, reps, weight))?;
            println!("✓ Logged set {} (id {}): {}", set.set_number, set.id, format_set(&set));
        }
        SetCommand::Update { id, reps, weight } => {
            let set = store.update(|db| db.update_set(id, SetUpdate { reps, weight }))?;
            println!("✓ Updated set {}: {}", set.id, format_set(&set));
        }
        SetCommand::Remove { id } => {
            store.update(|db| db.delete_set(id))?;
            println!("✓ Removed set {}", id);
        }
    }
    Ok(())
}

fn cmd_progress(store: &FileStore, lift: Option<i64>, csv: Option<PathBuf>) -> Result<()> {
    let db = store.load()?;
    let rows = match lift {
        Some(lift_id) => indexes_for_lift(&db, lift_id)?,
        None => indexes_for_all_workouts(&db)?,
    };

    println!("workout  date        strength  endurance");
    for row in &rows {
        println!(
            "{:>7}  {}  {:>8}  {:>9}",
            row.workout_id,
            row.date,
            format_index(row.strength_index),
            format_index(row.endurance_index)
        );
    }

    if let Some(path) = csv {
        let count = write_indexes_csv(&path, &rows)?;
        println!("✓ Wrote {} rows to {}", count, path.display());
    }
    Ok(())
}

fn display_suggestion(suggestion: &Suggestion) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  NEXT: {}", suggestion.lift.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Muscle group: {} (id {})",
        suggestion.muscle_group.name, suggestion.muscle_group.id
    );
    println!("  Lift id: {}", suggestion.lift.id);
    if suggestion.relaxation != CandidateFilter::AvoidUsedAndConflicting {
        println!("  (constraints relaxed: {:?})", suggestion.relaxation);
    }
    println!();

    if suggestion.previous_sets.is_empty() {
        println!("  No previous sets - first time!");
    } else {
        println!("  Last time:");
        for set in &suggestion.previous_sets {
            println!("  → {}", format_set(set));
        }
    }
    println!();
}

fn display_workout(detail: &WorkoutDetail) {
    println!(
        "Workout {}  {}  {}",
        detail.workout.id, detail.workout.date, detail.workout.subtitle
    );
    for lift in &detail.lifts {
        println!("  [{}] {}", lift.workout_lift.id, lift.lift_name);
        for set in &lift.sets {
            println!("      {}", format_set(set));
        }
    }
}

fn format_set(set: &WorkoutSet) -> String {
    let reps = set
        .reps
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".into());
    let weight = set
        .weight
        .map(|w| format!("{:.1}kg", w))
        .unwrap_or_else(|| "-".into());
    format!("#{} {} x {}", set.set_number, reps, weight)
}

fn format_index(index: Option<f64>) -> String {
    index
        .map(|i| format!("{:.3}", i))
        .unwrap_or_else(|| "-".into())
}

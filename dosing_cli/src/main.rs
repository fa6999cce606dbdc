use clap::{Args, Parser, Subcommand};
use dosing_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dosplan")]
#[command(about = "Medication dose schedule planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and print the dose plan (default)
    Plan {
        #[command(flatten)]
        course: CourseArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate how many days a pill supply lasts
    Estimate {
        /// Number of pills in the package
        #[arg(long)]
        pills: i64,
    },

    /// List doses due at a given date and minute
    Due {
        #[command(flatten)]
        course: CourseArgs,

        /// Date to check (YYYY-MM-DD)
        #[arg(long)]
        date: chrono::NaiveDate,

        /// Clock time to check (HH:MM)
        #[arg(long)]
        at: ClockTime,
    },

    /// Print the configured dosage stage table
    Stages,
}

/// Overrides for the configured course
#[derive(Args, Default)]
struct CourseArgs {
    /// First day of the course (YYYY-MM-DD, default today)
    #[arg(long)]
    start: Option<chrono::NaiveDate>,

    /// Course length in days
    #[arg(long)]
    days: Option<i64>,

    /// Pills in the package; overrides the course length
    #[arg(long)]
    pills: Option<i64>,

    /// Wake time (HH:MM)
    #[arg(long)]
    wake: Option<ClockTime>,

    /// Sleep time (HH:MM)
    #[arg(long)]
    sleep: Option<ClockTime>,
}

fn main() -> Result<()> {
    // Initialize logging
    dosing_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Plan { course, json }) => cmd_plan(&config, &course, json),
        Some(Commands::Estimate { pills }) => cmd_estimate(&config, pills),
        Some(Commands::Due { course, date, at }) => cmd_due(&config, &course, date, at),
        Some(Commands::Stages) => cmd_stages(&config),
        None => {
            // Default to "plan" command
            cmd_plan(&config, &CourseArgs::default(), false)
        }
    }
}

fn build_settings(config: &Config, course: &CourseArgs) -> TherapySettings {
    let start = course
        .start
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut settings = config.to_settings(start);

    if let Some(days) = course.days {
        settings.total_days = days;
    }
    if course.pills.is_some() {
        settings.pills_in_package = course.pills;
    }
    if let Some(wake) = course.wake {
        settings.wake_time = wake;
    }
    if let Some(sleep) = course.sleep {
        settings.sleep_time = sleep;
    }

    tracing::debug!(
        "Course from {}: {} days, pills {:?}",
        settings.start_date,
        settings.total_days,
        settings.pills_in_package
    );
    settings
}

fn cmd_plan(config: &Config, course: &CourseArgs, json: bool) -> Result<()> {
    let settings = build_settings(config, course);
    let schedule = plan_therapy(&settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    display_schedule(&schedule);
    Ok(())
}

fn cmd_estimate(config: &Config, pills: i64) -> Result<()> {
    let days = estimate_days(pills, &config.stages);

    if days >= MAX_ESTIMATED_DAYS {
        println!(
            "Supply not used up within {} days - check the stage table",
            MAX_ESTIMATED_DAYS
        );
    } else {
        println!("{} pills last {} days", pills, days);
    }

    Ok(())
}

fn cmd_due(config: &Config, course: &CourseArgs, date: chrono::NaiveDate, at: ClockTime) -> Result<()> {
    let settings = build_settings(config, course);
    let schedule = plan_therapy(&settings)?;

    let due = due_doses(std::slice::from_ref(&schedule), date, at.minute_of_day());
    if due.is_empty() {
        println!("No doses due at {} on {}", at, date);
        return Ok(());
    }

    for dose in due {
        let name = if dose.medication_name.is_empty() {
            "medication"
        } else {
            dose.medication_name.as_str()
        };
        println!("Dose due: {} at {}", name, dose.time);
    }

    Ok(())
}

fn cmd_stages(config: &Config) -> Result<()> {
    println!("{:<10} {:>10} {:>10}", "Days", "Interval", "Max/day");
    for stage in &config.stages {
        println!(
            "{:<10} {:>9}h {:>10}",
            stage.period.to_string(),
            stage.interval_hours,
            stage.max_doses_per_day
        );
    }
    Ok(())
}

fn display_schedule(schedule: &TherapySchedule) {
    let settings = &schedule.settings;

    println!("\n╭─────────────────────────────────────────╮");
    if settings.medication_name.is_empty() {
        println!("│  THERAPY PLAN");
    } else {
        println!("│  {} THERAPY PLAN", settings.medication_name);
    }
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {} days from {}, awake {}-{}",
        schedule.days.len(),
        settings.start_date,
        settings.wake_time,
        settings.sleep_time
    );
    println!();

    for day in &schedule.days {
        println!(
            "  Day {:>2}  {}  ({} doses, every {}h)",
            day.day_number,
            day.date,
            day.doses.len(),
            day.stage.interval_hours
        );
        let times: Vec<String> = day.doses.iter().map(|d| d.time.to_string()).collect();
        if !times.is_empty() {
            println!("    → {}", times.join("  "));
        }
    }

    println!();
}

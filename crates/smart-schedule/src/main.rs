//! # SmartSchedule CLI
//!
//! Runs the schedule web server and manages the schedule data file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "smart-schedule")]
#[command(author = "SmartSchedule Team")]
#[command(version)]
#[command(about = "College class schedule server", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Schedule data file
        #[arg(short, long)]
        data_file: Option<PathBuf>,

        /// Directory served under /static
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Inspect and edit lessons in the data file
    Lessons {
        /// Schedule data file
        #[arg(long, global = true)]
        data_file: Option<PathBuf>,

        #[command(subcommand)]
        action: LessonAction,
    },

    /// Write the seed schedule to the data file
    Init {
        /// Schedule data file
        #[arg(short, long)]
        data_file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Display version and build info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum LessonAction {
    /// List lessons, optionally filtered
    List {
        /// Exact group name
        #[arg(short, long)]
        group: Option<String>,

        /// Exact weekday name
        #[arg(short, long)]
        day: Option<String>,

        /// Case-insensitive teacher substring
        #[arg(short, long)]
        teacher: Option<String>,

        /// Exact room
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Add a lesson
    Add {
        /// Group name
        #[arg(short, long)]
        group: String,

        /// Weekday name
        #[arg(short, long)]
        day: String,

        /// Time slot number (1-6)
        #[arg(short = 's', long, default_value = "1")]
        time_slot: i64,

        /// Subject
        #[arg(long)]
        subject: String,

        /// Teacher
        #[arg(short, long)]
        teacher: String,

        /// Room
        #[arg(short, long, default_value = "")]
        room: String,

        /// Lesson type
        #[arg(short, long, default_value = schedule_core::DEFAULT_LESSON_KIND)]
        kind: String,
    },

    /// Remove a lesson by id
    Remove {
        /// Lesson id
        id: i64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set the default data file
    SetDataFile {
        /// Path to the schedule JSON file
        path: PathBuf,
    },

    /// Reset the data file to the default
    ClearDataFile,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging
    let telemetry_config = schedule_telemetry::TelemetryConfig::new("smart-schedule")
        .with_log_level(&cli.log_level);

    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };

    schedule_telemetry::init_logging(&telemetry_config);

    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_file,
            static_dir,
            no_cors,
        } => {
            let host = host.unwrap_or(cfg.server_host);
            let port = port.unwrap_or(cfg.server_port);
            let data_file = data_file.unwrap_or(cfg.data_file);
            let static_dir = static_dir.unwrap_or(cfg.static_dir);
            let cors = cfg.cors && !no_cors;
            commands::serve(host, port, data_file, static_dir, cors).await?;
        }

        Commands::Lessons { data_file, action } => {
            let data_file = data_file.unwrap_or(cfg.data_file);
            match action {
                LessonAction::List {
                    group,
                    day,
                    teacher,
                    room,
                } => {
                    let query = schedule_core::LessonQuery {
                        group,
                        day,
                        teacher,
                        room,
                    };
                    commands::lessons_list(data_file, query).await?;
                }
                LessonAction::Add {
                    group,
                    day,
                    time_slot,
                    subject,
                    teacher,
                    room,
                    kind,
                } => {
                    let lesson = schedule_core::NewLesson::new()
                        .with_group(group)
                        .with_day(day)
                        .with_time_slot(time_slot)
                        .with_subject(subject)
                        .with_teacher(teacher)
                        .with_room(room)
                        .with_kind(kind);
                    commands::lessons_add(data_file, lesson).await?;
                }
                LessonAction::Remove { id } => commands::lessons_remove(data_file, id).await?,
            }
        }

        Commands::Init { data_file, force } => {
            let data_file = data_file.unwrap_or(cfg.data_file);
            commands::init(data_file, force).await?;
        }

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::SetDataFile { path } => {
                let mut cfg = config::Config::load();
                match cfg.set_data_file(&path) {
                    Ok(()) => {
                        println!("Data file set to: {}", path.display());
                        println!("Config saved to: {}", config::Config::config_path().display());
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::ClearDataFile => {
                let mut cfg = config::Config::load();
                match cfg.clear_data_file() {
                    Ok(()) => {
                        println!("Data file reset to default.");
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}

//! CLI command implementations.

use std::net::SocketAddr;
use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};

use schedule_core::{LessonId, LessonQuery, NewLesson};
use schedule_store::{JsonFileStore, Schedule};

/// Start the web server.
pub async fn serve(
    host: String,
    port: u16,
    data_file: PathBuf,
    static_dir: PathBuf,
    cors: bool,
) -> Result<()> {
    use schedule_server::{Server, ServerConfig};

    tracing::info!("Starting SmartSchedule server...");

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let config = ServerConfig::builder()
        .addr(addr)
        .cors(cors)
        .data_file(data_file)
        .static_dir(static_dir)
        .build();

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}

fn open(data_file: PathBuf) -> Schedule {
    Schedule::new(JsonFileStore::new(data_file))
}

/// List lessons matching the filters.
pub async fn lessons_list(data_file: PathBuf, query: LessonQuery) -> Result<()> {
    let schedule = open(data_file);
    let document = schedule.document().await;
    let lessons = document.query(&query);

    if lessons.is_empty() {
        println!("  (No lessons found)");
        return Ok(());
    }

    for lesson in &lessons {
        println!(
            "  [{}] {} {} {:<13} {} / {} / ауд. {} ({})",
            lesson.id,
            lesson.group,
            lesson.day,
            document.time_slot_label(lesson.time_slot),
            lesson.subject,
            lesson.teacher,
            lesson.room,
            lesson.kind,
        );
    }
    println!("\nTotal: {}", lessons.len());

    Ok(())
}

/// Add a lesson to the data file.
pub async fn lessons_add(data_file: PathBuf, lesson: NewLesson) -> Result<()> {
    let schedule = open(data_file);
    let lesson = schedule.add_lesson(lesson).await?;

    println!("Lesson added with id {}", lesson.id);
    Ok(())
}

/// Remove a lesson from the data file.
pub async fn lessons_remove(data_file: PathBuf, id: LessonId) -> Result<()> {
    let schedule = open(data_file);
    let lesson = schedule.remove_lesson(id).await?;

    println!("Removed lesson {}: {} ({})", lesson.id, lesson.subject, lesson.group);
    Ok(())
}

/// Write the seed schedule to the data file.
pub async fn init(data_file: PathBuf, force: bool) -> Result<()> {
    let store = JsonFileStore::new(&data_file);
    if !force && store.exists().await {
        return Err(eyre!(
            "{} already exists. Use --force to overwrite it.",
            data_file.display()
        ));
    }

    let document = Schedule::new(store).reset().await?;

    println!("Schedule written to {}", data_file.display());
    println!(
        "  {} groups, {} lessons",
        document.groups.len(),
        document.lessons.len()
    );
    Ok(())
}

/// Display version information.
pub fn version() {
    println!("SmartSchedule {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Components:");
    println!("  schedule-core       - Data model, filters, current lesson");
    println!("  schedule-store      - JSON document store");
    println!("  schedule-server     - Web pages and JSON API");
    println!("  schedule-telemetry  - Logging");
}

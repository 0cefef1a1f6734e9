use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reading_progress::{
    Chapter, HttpFeed, InMemoryStore, JsonFileStore, RemoteFeed, StaticFeed, Stores, Title,
    TitleList, Tracker, TrackerConfig, TrackerError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "progress", about = "Track reading progress across serialized titles")]
struct Cli {
    /// Durable store file.
    #[arg(long, default_value = "progress.json")]
    store: PathBuf,

    /// Skip the remote feed and use local titles only.
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List titles, most recently touched first.
    List,
    /// Add or overwrite a title.
    AddTitle {
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value_t = 0)]
        touched: i64,
    },
    /// Record a chapter under an existing title.
    AddChapter {
        title: String,
        code: String,
        no: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Forget a chapter.
    RemoveChapter { title: String, code: String },
    /// Delete a title.
    DeleteTitle {
        id: String,
        /// Also remove the title's chapter records.
        #[arg(long)]
        cascade: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = TrackerConfig::from_env();

    let local = match JsonFileStore::open(&cli.store) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!(%error, "could not open durable store");
            return ExitCode::FAILURE;
        }
    };
    let stores = Stores::with_session_key(local, InMemoryStore::new(), config.session_key.clone());

    let result = if cli.offline {
        run(Tracker::new(stores, StaticFeed::unavailable("offline mode")), cli.command).await
    } else {
        run(Tracker::new(stores, HttpFeed::from_config(&config)), cli.command).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run<F: RemoteFeed>(
    tracker: Tracker<JsonFileStore, InMemoryStore, F>,
    command: Command,
) -> Result<(), TrackerError> {
    let mut titles = tracker.init().await?;

    match command {
        Command::List => {}
        Command::AddTitle {
            id,
            name,
            author,
            touched,
        } => {
            let title = Title::new(id)?
                .with_name(name)
                .with_author(author)
                .with_touched(touched);
            tracker.add_title(&mut titles, title)?;
        }
        Command::AddChapter {
            title,
            code,
            no,
            name,
        } => {
            let chapter = Chapter::new(title.as_str(), code, no, name)?;
            if !tracker.add_chapter(&mut titles, chapter)? {
                tracing::warn!(title = %title, "no such title");
            }
        }
        Command::RemoveChapter { title, code } => {
            if !tracker.remove_chapter(&mut titles, &title, &code)? {
                tracing::warn!(title = %title, code = %code, "no such chapter");
            }
        }
        Command::DeleteTitle { id, cascade } => {
            if !tracker.delete_title(&mut titles, &id, cascade)? {
                tracing::warn!(id = %id, "no such title");
            }
        }
    }

    print_titles(&mut titles);
    Ok(())
}

fn print_titles(titles: &mut TitleList) {
    let order: Vec<String> = titles.to_sorted_arr().iter().map(|t| t.id.clone()).collect();
    for id in order {
        let Some(title) = titles.get_mut(&id) else {
            continue;
        };
        let last = title
            .last_chapter()
            .map(|c| format!("{} {}", c.no, c.name))
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}\t{}", title.id, title.name, title.author, last);
    }
}

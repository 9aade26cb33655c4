mod args;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;

use exam_core::model::{AuthToken, Document, DocumentId, UploadFile, UploadKind};
use exam_core::DocumentProgress;
use services::notice::{self, Notice};
use services::{
    AnalysisService, AppServices, AppServicesError, ClientConfig, Clock, ConfigError,
    DocumentStore, QuizSession, QuizService, UploadSelection,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, ArgsError, Command, print_usage};

#[derive(Debug)]
enum CliError {
    Args(ArgsError),
    Config(ConfigError),
    Services(AppServicesError),
    Io(io::Error),
    /// A service failure, already phrased for the user.
    Notice(Notice),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Args(err) => write!(f, "{err}"),
            CliError::Config(err) => write!(f, "configuration error: {err}"),
            CliError::Services(err) => write!(f, "could not start: {err}"),
            CliError::Io(err) => write!(f, "{err}"),
            CliError::Notice(notice) => write!(f, "{notice}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ArgsError> for CliError {
    fn from(err: ArgsError) -> Self {
        CliError::Args(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<AppServicesError> for CliError {
    fn from(err: AppServicesError) -> Self {
        CliError::Services(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

/// Turn a service error into its user-facing notice.
fn to_notice<E>(err: E) -> CliError
where
    for<'a> Notice: From<&'a E>,
{
    CliError::Notice(Notice::from(&err))
}

fn build_config(args: &Args) -> Result<ClientConfig, CliError> {
    let config = match &args.api_url {
        // A flag-supplied URL still picks up token and user from the environment.
        Some(url) => ClientConfig::from_lookup(|var| match var {
            services::config::API_URL_VAR => Some(url.clone()),
            other => std::env::var(other).ok(),
        })?,
        None => ClientConfig::from_env()?,
    };
    Ok(match &args.token {
        Some(token) => config.with_token(AuthToken::new(token.as_str())),
        None => config,
    })
}

async fn run() -> Result<(), CliError> {
    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let config = build_config(&args)?;
    info!(api_url = %config.api_url, authenticated = config.token.is_some(), "starting");
    let services = AppServices::from_config(&config, Clock::default())?;
    if services.session().is_authenticated() {
        println!("Welcome back, {}!", services.session().greeting_name());
    }

    match args.command {
        Command::Help => Ok(()),
        Command::Documents => {
            let store = loaded_store(&services).await?;
            print_documents(&store);
            Ok(())
        }
        Command::Topics { document } => {
            let store = loaded_store(&services).await?;
            let document = store
                .get(&document)
                .ok_or_else(|| unknown_document(&document))?;
            print_topics(document);
            Ok(())
        }
        Command::Toggle {
            document,
            topic,
            save,
        } => {
            let mut store = loaded_store(&services).await?;
            let completed = store
                .toggle_topic_completion(&document, topic)
                .map_err(to_notice)?;
            println!(
                "Topic {topic} marked {}.",
                if completed { "complete" } else { "incomplete" }
            );
            if let Some(progress) = store.progress(&document) {
                print_progress(&progress);
            }
            if save {
                store.save(&document).await.map_err(to_notice)?;
                println!("{}", notice::progress_saved());
            } else {
                println!("Not saved; pass --save to record this change.");
            }
            Ok(())
        }
        Command::Playlists { document } => {
            let mut store = loaded_store(&services).await?;
            let had_playlists = store.get(&document).is_some_and(Document::has_playlists);
            let document = store.fetch_playlists(&document).await.map_err(to_notice)?;
            if !had_playlists {
                println!("{}", notice::resources_loaded());
            }
            for playlist in document.playlists() {
                println!("  {}  {}", playlist.playlist_name, playlist.link);
            }
            Ok(())
        }
        Command::Quiz { document } => run_quiz(&services.quiz_service(), &document).await,
        Command::Analyze {
            name,
            papers,
            syllabus,
        } => {
            let mut selection = UploadSelection::new();
            add_files(&mut selection, UploadKind::Papers, &papers)?;
            add_files(&mut selection, UploadKind::Syllabus, &syllabus)?;
            run_analysis(&services.analysis_service(), selection, name).await
        }
    }
}

fn unknown_document(id: &DocumentId) -> CliError {
    CliError::Notice(Notice::error("Error", format!("Document {id} is not loaded.")))
}

async fn loaded_store(services: &AppServices) -> Result<DocumentStore, CliError> {
    let mut store = services.document_store();
    store.load().await.map_err(to_notice)?;
    Ok(store)
}

//
// ─── OUTPUT ────────────────────────────────────────────────────────────────────
//

fn print_progress(progress: &DocumentProgress) {
    println!(
        "{}/{} topics complete ({}%)",
        progress.completed, progress.total, progress.percentage
    );
}

fn print_documents(store: &DocumentStore) {
    if store.is_empty() {
        println!("No analyses yet. Run `examprep analyze` to create one.");
        return;
    }
    for document in store.documents() {
        let progress = DocumentProgress::of(document);
        let created = document
            .created_at()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{}  {} [{}] {}  {}/{} topics ({}%){}",
            document.id(),
            document.document_name(),
            document.subject(),
            created,
            progress.completed,
            progress.total,
            progress.percentage,
            if progress.has_playlists { "  +playlists" } else { "" }
        );
    }
}

fn print_topics(document: &Document) {
    println!("{} ({})", document.document_name(), document.subject());
    for (index, topic) in document.topics().iter().enumerate() {
        println!(
            "  {index:>2} [{}] {}  ({} priority, {})",
            if topic.is_completed() { "x" } else { " " },
            topic.main_topic(),
            topic.priority(),
            topic.difficulty()
        );
        for side in topic.side_topics() {
            println!("       - {side}");
        }
    }
    print_progress(&DocumentProgress::of(document));
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

async fn run_quiz(quizzes: &QuizService, document: &DocumentId) -> Result<(), CliError> {
    let mut session = quizzes.start_quiz(document).await.map_err(to_notice)?;
    println!("Quiz: {}", session.subject());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.is_finished() {
        print_question(&session);
        print!("answer [1-{}], b = back, q = quit > ", session.current_question().options.len());
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            return Ok(());
        };
        match line.trim() {
            "q" => return Ok(()),
            "b" => {
                session.previous().map_err(to_notice)?;
            }
            input => {
                if let Err(err) = answer(&mut session, input) {
                    println!("{err}");
                }
            }
        }
    }

    if let Some(outcome) = session.outcome() {
        println!(
            "\nScore: {}/{} ({}%) {}",
            outcome.score,
            outcome.total,
            outcome.percentage,
            if outcome.passed() { "passed" } else { "keep practising" }
        );
        if !outcome.weak_topics.is_empty() {
            println!("Review: {}", outcome.weak_topics.join(", "));
        }
    }
    Ok(())
}

fn print_question(session: &QuizSession) {
    let progress = session.progress();
    let question = session.current_question();
    println!(
        "\nQuestion {} of {}: {}",
        progress.position(),
        progress.total,
        question.question
    );
    for (index, option) in question.options.iter().enumerate() {
        let marker = if session.current_answer() == Some(index) { '*' } else { ' ' };
        println!("  {marker}{}. {option}", index + 1);
    }
}

/// Record a one-based option and move on, finishing on the last question.
fn answer(session: &mut QuizSession, input: &str) -> Result<(), Notice> {
    let option = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| Notice::info("Pick an Answer", "Enter the number of an option."))?;
    session.select_answer(option).map_err(|e| Notice::from(&e))?;
    let step = if session.is_last_question() {
        session.finish().map(|_| ())
    } else {
        session.next().map(|_| ())
    };
    step.map_err(|e| Notice::from(&e))
}

//
// ─── ANALYSIS ──────────────────────────────────────────────────────────────────
//

fn add_files(
    selection: &mut UploadSelection,
    kind: UploadKind,
    paths: &[std::path::PathBuf],
) -> Result<(), CliError> {
    if paths.is_empty() {
        return Ok(());
    }
    let files = paths
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>, _>>()?;
    let outcome = selection.add(kind, files).map_err(to_notice)?;
    for rejected in &outcome.rejected {
        println!("{}", Notice::from(rejected));
    }
    if outcome.accepted > 0 {
        println!("{}", notice::files_added(kind, outcome.accepted));
    }
    Ok(())
}

fn read_upload(path: &Path) -> Result<UploadFile, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(UploadFile::guessing_mime(file_name, bytes))
}

async fn run_analysis(
    analyses: &AnalysisService,
    selection: UploadSelection,
    name: String,
) -> Result<(), CliError> {
    println!("{}", Notice::info("Analysis Started", "Processing your documents..."));
    let analysis = analyses
        .analyze(selection.into_request(name))
        .await
        .map_err(to_notice)?;

    println!("{}", analysis.notice());
    if analysis.is_demo() {
        println!("*** DEMO DATA: the results below are a sample, not an analysis of your papers ***");
    }

    let result = &analysis.result;
    println!(
        "\n{}  (score {}/{})",
        result.exam_name, result.overall_score, result.total_marks_analyzed
    );
    if let Some(id) = &result.id {
        println!("id: {id}");
    }
    for topic in &result.topics {
        println!(
            "  - {} [{} priority, {}]",
            topic.main_topic(),
            topic.priority(),
            topic.difficulty()
        );
        for question in topic.question_types() {
            println!("      ? {question}");
        }
    }
    for insight in &result.key_insights {
        println!("  * {insight}");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

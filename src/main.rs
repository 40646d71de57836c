//! Word Mentor - Entry Point
//!
//! Command-line front end for the vocabulary engine. Sets up logging, the
//! storage scopes and the async runtime for LLM calls, then dispatches to
//! one subcommand. `session` runs an interactive micro-session on stdin.

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use word_mentor::catalog::Catalog;
use word_mentor::core::error::{MentorError, Result};
use word_mentor::core::{MentorConfig, UserId};
use word_mentor::handoff::{HandoffContext, SessionHandoff};
use word_mentor::llm::{recommend_with_fallback, LlmClient};
use word_mentor::saved::SavedWordsManager;
use word_mentor::session::{
    InteractionResponse, LearningStep, ProgressStore, SessionController, SessionInteraction, TaskKind,
    TaskType, TemplateGenerator,
};
use word_mentor::storage::{FileStore, MemoryStore, Storage};
use word_mentor::tracking::BehaviorTracker;

/// Word Mentor - adaptive vocabulary micro-sessions
#[derive(Parser, Debug)]
#[command(name = "word-mentor")]
#[command(about = "Learn vocabulary through short, personalized micro-sessions")]
struct Args {
    /// Learner id
    #[arg(long, global = true, default_value = "default")]
    user: String,

    /// Directory for persistent data (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// TOML word catalog (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed for exercise generation
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog words
    Catalog {
        /// Only words in this cluster
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Pick words for the next session
    Select {
        #[arg(required = true)]
        words: Vec<String>,
        /// Base URL for the printed session link
        #[arg(long, default_value = "http://localhost:3000/session")]
        base_url: String,
    },
    /// Run a micro-session over the given or previously selected words
    Session {
        words: Vec<String>,
        /// Session URL carrying a `words` parameter
        #[arg(long)]
        url: Option<String>,
        /// Force one exercise type for every word
        #[arg(long, value_enum)]
        task: Option<TaskArg>,
        /// Continue the last unfinished session
        #[arg(long, conflicts_with_all = ["words", "url", "task"])]
        resume: bool,
    },
    /// Star a word
    Save { word: String },
    /// Unstar a word
    Unsave { word: String },
    /// List starred words
    Saved,
    /// Show the learner profile
    Profile,
    /// Reset the learner profile to defaults
    Reset,
    /// Suggest words for the next session
    Recommend {
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TaskArg {
    Scenario,
    Completion,
    Choice,
    Application,
}

impl From<TaskArg> for TaskType {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Scenario => TaskType::Scenario,
            TaskArg::Completion => TaskType::Completion,
            TaskArg::Choice => TaskType::Choice,
            TaskArg::Application => TaskType::Application,
        }
    }
}

/// Everything a subcommand needs
struct App {
    config: MentorConfig,
    user: UserId,
    catalog: Arc<Catalog>,
    storage: Storage,
    tracker: BehaviorTracker,
    saved: SavedWordsManager,
    progress: ProgressStore,
    handoff: SessionHandoff,
    seed: Option<u64>,
}

impl App {
    fn init(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => MentorConfig::load(path)?,
            None => MentorConfig::default(),
        };
        if let Some(dir) = &args.data_dir {
            config.storage.data_dir = dir.clone();
        }
        config.validate()?;

        let catalog = Arc::new(match &args.catalog {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin()?,
        });
        tracing::debug!(words = catalog.len(), "catalog loaded");

        let persistent = Arc::new(FileStore::open(&config.storage.data_dir)?);
        let storage = Storage::new(Arc::new(MemoryStore::new()), persistent);
        let user = UserId::new(args.user.clone());

        Ok(Self {
            tracker: BehaviorTracker::new(storage.persistent.clone(), catalog.clone(), &config),
            saved: SavedWordsManager::new(storage.persistent.clone()),
            progress: ProgressStore::new(storage.persistent.clone()),
            handoff: SessionHandoff::from_config(&config.handoff, &user),
            config,
            user,
            catalog,
            storage,
            seed: args.seed,
        })
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("word_mentor=info")),
        )
        .init();

    let args = Args::parse();
    let app = App::init(&args)?;
    tracing::info!(user = %app.user, data_dir = %app.config.storage.data_dir.display(), "word mentor starting");

    match args.command {
        Command::Catalog { cluster } => list_catalog(&app, cluster.as_deref()),
        Command::Select { words, base_url } => select_words(&app, &words, &base_url)?,
        Command::Session { resume: true, .. } => resume_session(&app)?,
        Command::Session { words, url, task, .. } => run_session(&app, words, url.as_deref(), task)?,
        Command::Save { word } => {
            let entry = app
                .catalog
                .find(&word)
                .ok_or_else(|| MentorError::Input(format!("'{}' is not in the catalog", word)))?;
            if app.saved.save_word(&app.user, entry)? {
                println!("Saved '{}'.", entry.word);
            } else {
                println!("'{}' was already saved.", entry.word);
            }
        }
        Command::Unsave { word } => {
            if app.saved.unsave_word(&app.user, &word)? {
                println!("Removed '{}'.", word.trim());
            } else {
                println!("'{}' was not saved.", word.trim());
            }
        }
        Command::Saved => {
            let saved = app.saved.get_saved_words(&app.user);
            if saved.is_empty() {
                println!("No saved words yet.");
            }
            for word in saved {
                println!(
                    "  {:<14} {} [{}] (saved {})",
                    word.word,
                    word.definition,
                    word.cluster,
                    word.saved_at.format("%Y-%m-%d")
                );
            }
        }
        Command::Profile => {
            let profile = app.tracker.profiles().load(&app.user);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Reset => {
            app.tracker.profiles().reset(&app.user)?;
            println!("Profile for '{}' reset.", app.user);
        }
        Command::Recommend { count } => recommend(&app, count)?,
    }

    Ok(())
}

fn list_catalog(app: &App, cluster: Option<&str>) {
    let clusters: Vec<&str> = match cluster {
        Some(name) => vec![name],
        None => app.catalog.clusters(),
    };

    for name in clusters {
        let words = app.catalog.by_cluster(name);
        if words.is_empty() {
            println!("No words in cluster '{}'.", name);
            continue;
        }
        println!("\n=== {} ===", name);
        for entry in words {
            println!("  {:<14} (difficulty {}) {}", entry.word, entry.difficulty, entry.definition);
        }
    }
    println!();
}

fn select_words(app: &App, words: &[String], base_url: &str) -> Result<()> {
    let available: Vec<String> = app.catalog.entries().iter().map(|e| e.word.clone()).collect();
    let unknown: Vec<&String> = words.iter().filter(|w| app.catalog.find(w).is_none()).collect();
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "selected words outside the catalog");
    }

    app.tracker.track_word_selection(&app.user, words, &available);
    if app.handoff.publish(&app.storage, words) == 0 {
        tracing::warn!("selected words were not stored, only the session link carries them");
    }

    println!("Selected {} word(s).", words.len());
    println!("Start the session at: {}", app.handoff.session_url(base_url, words)?);
    Ok(())
}

fn recommend(app: &App, count: Option<usize>) -> Result<()> {
    let count = count.unwrap_or(app.config.session.recommendation_count);
    let profile = app.tracker.profiles().load(&app.user);

    let llm_client = LlmClient::from_config(&app.config.llm).ok();
    if llm_client.is_none() {
        tracing::warn!("{} not set - using local recommendations", app.config.llm.api_key_env);
    }

    let rt = Runtime::new()?;
    let words = rt.block_on(recommend_with_fallback(
        llm_client.as_ref(),
        &app.catalog,
        Some(&profile),
        count,
    ));

    println!("Recommended for '{}':", app.user);
    for word in &words {
        match app.catalog.find(word) {
            Some(entry) => println!("  {:<14} {}", entry.word, entry.definition),
            None => println!("  {}", word),
        }
    }
    Ok(())
}

fn run_session(app: &App, words: Vec<String>, url: Option<&str>, task: Option<TaskArg>) -> Result<()> {
    let words = if words.is_empty() {
        match app.handoff.resolve(&HandoffContext::new(&app.storage, url)) {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!(error = %e, "no words handed off");
                Vec::new()
            }
        }
    } else {
        words
    };

    let entries = app.catalog.resolve(&words);
    let profile = app.tracker.profiles().load(&app.user);

    let mut generator = TemplateGenerator::new(app.rng());
    if let Some(task) = task {
        generator = generator.with_task_type(task.into());
    }

    let mut controller = SessionController::new()
        .with_reporter(Box::new(app.tracker.reporter(&app.user)));
    controller.load(&entries, Some(&profile), &mut generator, app.config.session.generation_retries)?;

    if let Some(failure) = controller.failure() {
        println!("Could not start the session: {}", failure);
        println!("Next step: {}", failure.recovery_action());
        return Ok(());
    }
    app.handoff.clear(&app.storage);
    drive_session(app, controller)
}

fn resume_session(app: &App) -> Result<()> {
    let Some(snapshot) = app.progress.load(&app.user) else {
        println!("No unfinished session for '{}'.", app.user);
        return Ok(());
    };
    let controller = match SessionController::resume(snapshot) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unusable session snapshot");
            if let Err(e) = app.progress.clear(&app.user) {
                tracing::warn!(error = %e, "failed to discard session snapshot");
            }
            println!("The saved session could not be resumed. Start a new one.");
            return Ok(());
        }
    };
    drive_session(app, controller.with_reporter(Box::new(app.tracker.reporter(&app.user))))
}

/// Interactive loop over a `Ready` controller, saving a snapshot after each word
fn drive_session(app: &App, mut controller: SessionController) -> Result<()> {
    println!("\n=== WORD MENTOR ===");
    println!(
        "Word {} of {}. Press enter to continue, 'skip' to skip a word, 'quit' to stop.",
        controller.current_index() + 1,
        controller.total()
    );

    save_progress(app, &controller);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(interaction) = controller.current().cloned() {
        println!(
            "\n--- {} / {}: {} ---",
            controller.current_index() + 1,
            controller.total(),
            interaction.word
        );

        let started = Instant::now();
        let Some(response) = present(&interaction, &mut lines, started)? else {
            println!("Session paused. Continue with `word-mentor session --resume`.");
            return Ok(());
        };
        controller.advance(response)?;
        save_progress(app, &controller);
    }

    if let Some(metrics) = controller.metrics() {
        let types: Vec<String> = metrics.display_types.iter().map(|t| t.to_string()).collect();
        println!("\n=== Session complete ===");
        println!("  Completed: {} / {}", metrics.completed_count, metrics.total_count);
        println!("  Skipped:   {}", metrics.skipped_count);
        println!("  Correct:   {}", metrics.correct_count);
        println!("  Time:      {:.0}s ({:.0}s per word)", metrics.total_duration_secs, metrics.average_secs_per_interaction);
        println!("  Exercises: {}", types.join(", "));
    }

    let profile = app.tracker.profiles().load(&app.user);
    println!(
        "  Level:     {:.2} (confidence {:.0}%)",
        profile.vocabulary_level.estimated_level,
        profile.vocabulary_level.confidence * 100.0
    );
    Ok(())
}

/// Keep the stored snapshot in step with the controller; completed sessions leave none
fn save_progress(app: &App, controller: &SessionController) {
    let saved = match controller.snapshot() {
        Some(snapshot) => app.progress.save(&app.user, &snapshot),
        None => app.progress.clear(&app.user),
    };
    if let Err(e) = saved {
        tracing::warn!(error = %e, "failed to save session progress");
    }
}

fn prompt_line<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Walk one interaction's steps; `None` when the learner quits
fn present<B: BufRead>(
    interaction: &SessionInteraction,
    lines: &mut io::Lines<B>,
    started: Instant,
) -> Result<Option<InteractionResponse>> {
    let elapsed = || started.elapsed().as_millis() as u64;
    let mut answer = None;
    let mut step = Some(LearningStep::Definition);

    while let Some(current) = step {
        println!("\n[{}]", current.title());
        match current {
            LearningStep::Definition => {
                println!("  {} ({})", interaction.word, interaction.definition.part_of_speech);
                println!("  {}", interaction.definition.text);
            }
            LearningStep::Task => {
                let task = &interaction.task;
                println!("  {}", task.prompt);
                if let TaskKind::Choice { options, .. } = &task.kind {
                    for (i, option) in options.iter().enumerate() {
                        println!("    {}. {}", i + 1, option);
                    }
                }
                println!("  ({})", task.instruction);
            }
            LearningStep::Anchor => {
                println!("  {}", interaction.anchor.prompt);
                println!("  {}", interaction.anchor.scene);
                println!("  {}", interaction.anchor.reflection);
            }
        }

        let Some(input) = prompt_line(lines)? else {
            return Ok(None);
        };
        match input.as_str() {
            "quit" | "q" => return Ok(None),
            "skip" | "s" => return Ok(Some(InteractionResponse::skipped(&interaction.word, elapsed()))),
            _ => {}
        }

        if current == LearningStep::Task {
            let given = choice_answer(interaction, &input);
            if let Some(correct) = interaction.task.check(&given) {
                println!("  {}", if correct { "Correct!" } else { "Not quite." });
            }
            answer = Some(given);
        }
        step = current.next();
    }

    let answer = answer.unwrap_or_default();
    let correct = interaction.task.check(&answer);
    Ok(Some(InteractionResponse::answered(&interaction.word, answer, correct, elapsed())))
}

/// Map a numbered pick back to the option text
fn choice_answer(interaction: &SessionInteraction, input: &str) -> String {
    if let TaskKind::Choice { options, .. } = &interaction.task.kind {
        if let Some(option) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
        {
            return option.clone();
        }
    }
    input.to_string()
}

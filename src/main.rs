//! Main CLI application for the Cross Flip solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossflip_solver::{
    board::{load_board_from_file, parse_board_text, save_board_to_file, Board},
    config::{CliOverrides, OutputFormat, Settings, Strategy},
    puzzle::{create_sample_store, BoardAnalysis, FlipProblem, PressSetValidator, PuzzleStore},
    utils::{BoardFormatter, ColorOutput},
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "crossflip_solver")]
#[command(about = "Cross Flip puzzle solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a level from the puzzle store, or an inline board
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle store file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Level to solve (defaults to the latest stored level)
        #[arg(short, long)]
        level: Option<u32>,

        /// Inline board such as "1001,1220" (bypasses the puzzle store)
        #[arg(short, long, conflicts_with = "board_file")]
        board: Option<String>,

        /// Board file with one row per line (bypasses the puzzle store)
        #[arg(long)]
        board_file: Option<PathBuf>,

        /// Solving strategy (overrides config)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Backtracking node budget (overrides config)
        #[arg(long)]
        max_nodes: Option<u64>,

        /// Backtracking time budget in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Do not write the solution back to the puzzle store
        #[arg(long)]
        no_write: bool,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Show the board with the pressed cells marked
        #[arg(long)]
        show_board: bool,
    },

    /// Check that a solution string clears a board
    Verify {
        /// Board such as "1001,1220"
        #[arg(short, long)]
        board: String,

        /// Solution digits, one per cell in row-major order
        #[arg(short, long)]
        solution: String,
    },

    /// Report the size, rank and solvability of a board
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Inline board (otherwise a level is read from the puzzle store)
        #[arg(short, long)]
        board: Option<String>,

        /// Puzzle store file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Stored level to analyze
        #[arg(short, long)]
        level: Option<u32>,
    },

    /// Create a default configuration and a sample puzzle store
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Solve {
            config,
            puzzle,
            level,
            board,
            board_file,
            strategy,
            max_nodes,
            timeout,
            no_write,
            format,
            show_board,
        } => {
            let overrides = CliOverrides {
                strategy,
                max_nodes,
                timeout_seconds: timeout,
                puzzle_file: puzzle,
                level,
                no_write,
                format,
            };
            let inline = match (board, board_file) {
                (Some(text), _) => Some(parse_board_text(&text)?),
                (None, Some(path)) => Some(load_board_from_file(&path)?),
                (None, None) => None,
            };
            solve_command(config, overrides, inline, show_board)
        }
        Commands::Verify { board, solution } => verify_command(&board, &solution),
        Commands::Analyze {
            config,
            board,
            puzzle,
            level,
        } => analyze_command(config, board, puzzle, level),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        debug!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(Settings::default())
    }
}

fn solve_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    inline: Option<Board>,
    show_board: bool,
) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let format = settings.output.format;
    let write_back = settings.output.write_back;

    let start_time = Instant::now();
    let problem = match inline {
        Some(board) => FlipProblem::with_board(settings, board),
        None => FlipProblem::new(settings).context("Failed to load puzzle")?,
    };

    let report = match problem.solve() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}", ColorOutput::error(&format!("No solution: {:#}", err)));
            return Err(err);
        }
    };

    println!("{}", BoardFormatter::render_report(&report, format, show_board)?);

    if write_back && problem.write_back(&report)? {
        eprintln!(
            "{}",
            ColorOutput::success(&format!(
                "Solution saved to {}",
                problem.settings().input.puzzle_file.display()
            ))
        );
    }

    debug!(total_ms = start_time.elapsed().as_millis() as u64, "Solve command finished");
    Ok(())
}

fn verify_command(board_text: &str, solution: &str) -> Result<()> {
    let board = parse_board_text(board_text)?;
    let result = PressSetValidator::new()
        .validate_solution_string(&board, solution)
        .context("Failed to read solution")?;

    println!("{}", result);

    if result.is_valid() {
        println!("{}", ColorOutput::success("Solution clears the board"));
        Ok(())
    } else {
        println!("{}", ColorOutput::error("Solution does not clear the board"));
        anyhow::bail!("Invalid solution")
    }
}

fn analyze_command(
    config_path: PathBuf,
    board_text: Option<String>,
    puzzle: Option<PathBuf>,
    level: Option<u32>,
) -> Result<()> {
    let board = match board_text {
        Some(text) => parse_board_text(&text)?,
        None => {
            let mut settings = load_settings(&config_path)?;
            settings.merge_with_cli(&CliOverrides {
                puzzle_file: puzzle,
                level,
                ..CliOverrides::default()
            });
            let store = PuzzleStore::load(&settings.input.puzzle_file)?;
            let level = match settings.input.level {
                Some(level) => level,
                None => store.latest_level().context("Puzzle store is empty")?,
            };
            println!("Level {}", level);
            store.board(level)?
        }
    };

    let analysis = BoardAnalysis::of(&board);
    println!("{}", BoardFormatter::format_analysis(&board, &analysis));
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up solver files..."));

    let config_path = directory.join("config/default.yaml");
    let puzzle_path = directory.join("puzzle.json");
    let board_path = directory.join("input/sample_board.txt");

    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    write_unless_exists(&puzzle_path, force, |path| create_sample_store(path))
        .context("Failed to create sample puzzle store")?;

    write_unless_exists(&board_path, force, |path| {
        let board = parse_board_text("1001\n1220\n0110")?;
        save_board_to_file(&board, path)
    })
    .context("Failed to create sample board")?;

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Add levels to {}", puzzle_path.display());
    println!("2. Run: crossflip_solver solve --config {}", config_path.display());

    Ok(())
}

fn write_unless_exists<F>(path: &Path, force: bool, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(());
    }
    write(path)?;
    println!("Created: {}", path.display());
    Ok(())
}

use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mega_invaders::{App, AudioManager, DEFAULT_MUSIC, GameConfig, InputManager};

/// Mega Invaders - clear the metroid wave, then take down Ridley
#[derive(Parser)]
#[command(name = "mega-invaders")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long, default_value = "mega-invaders.log")]
    log_file: PathBuf,

    /// Seed for the boss's random movement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable background music
    #[arg(long)]
    mute: bool,

    /// Background music file
    #[arg(long, default_value = DEFAULT_MUSIC)]
    music: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(File::create(&cli.log_file)?))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = GameConfig {
        seed: cli.seed,
        ..GameConfig::default()
    };
    let (audio, music) = if cli.mute {
        (None, None)
    } else {
        (AudioManager::try_default(), Some(cli.music))
    };

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!(supports_keyboard_enhancement, seed = ?config.seed, "starting");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key release events need the enhancement flags, pushed after entering the alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let input = InputManager::new(config.keys.clone(), supports_keyboard_enhancement);
    let result = App::new(config, input, audio, music).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

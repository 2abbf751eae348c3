use clap::Parser;
use color_eyre::Result;
use crossterm::{
    cursor::Show,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::{Write, stdout};
use std::path::PathBuf;

use invaders::app::App;
use invaders::config::{Field, FirePolicy, GameConfig, HitPolicy};
use invaders::simulation::Simulation;

#[derive(Debug, Parser)]
#[command(name = "invaders", about = "Shoot down the descending formations")]
struct Cli {
    /// Field width in field units
    #[arg(long, default_value_t = 480.0)]
    width: f64,
    /// Field height in field units
    #[arg(long, default_value_t = 700.0)]
    height: f64,
    /// Only shoot while Space is held instead of firing automatically
    #[arg(long)]
    trigger_fire: bool,
    /// When a shot overlaps several enemies, destroy the closest one
    #[arg(long)]
    nearest_hit: bool,
    /// Seed for formation generation
    #[arg(long)]
    seed: Option<u64>,
    /// Where log output goes; the terminal is busy drawing the game
    #[arg(long, default_value = "invaders.log")]
    log_file: PathBuf,
}

impl Cli {
    fn config(&self) -> GameConfig {
        GameConfig {
            field: Field::new(self.width, self.height),
            fire_policy: if self.trigger_fire {
                FirePolicy::Trigger
            } else {
                FirePolicy::Auto
            },
            hit_policy: if self.nearest_hit {
                HitPolicy::Nearest
            } else {
                HitPolicy::FirstMatch
            },
            ..GameConfig::default()
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let config = cli.config();
    config.validate()?;
    log::info!("starting with {:?}", config);

    let simulation = match cli.seed {
        Some(seed) => Simulation::with_seed(config, seed),
        None => Simulation::new(config),
    };

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    enable_raw_mode()?;
    let result = run_in_terminal(simulation, supports_keyboard_enhancement);
    let restored = restore_terminal(&mut stdout(), supports_keyboard_enhancement);

    if let Err(err) = &result {
        log::error!("game loop failed: {err}");
    }
    if let Err(err) = &restored {
        log::error!("failed to restore terminal: {err}");
    }
    result.and(restored)
}

fn run_in_terminal(simulation: Simulation, supports_keyboard_enhancement: bool) -> Result<()> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key release events need the enhancement flags
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
    App::new(simulation, supports_keyboard_enhancement).run(&mut terminal)
}

/// Undoes the terminal setup. Every step runs; the first failure is returned.
fn restore_terminal<W: Write>(out: &mut W, supports_keyboard_enhancement: bool) -> Result<()> {
    let flags = if supports_keyboard_enhancement {
        execute!(out, PopKeyboardEnhancementFlags)
    } else {
        Ok(())
    };
    let raw_mode = disable_raw_mode();
    let screen = execute!(out, LeaveAlternateScreen, Show);
    flags.and(raw_mode).and(screen)?;
    Ok(())
}

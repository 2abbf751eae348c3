use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::simulation::{GameEvent, Simulation};

/// Sleep between frames to stay near 60 FPS without spinning the CPU
const FRAME_SLEEP: Duration = Duration::from_millis(8);

/// The main application which drives the simulation from the terminal.
pub struct App {
    running: bool,
    simulation: Simulation,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    run_started: Instant,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(simulation: Simulation, reports_release: bool) -> Self {
        let now = Instant::now();
        Self {
            running: true,
            simulation,
            last_frame_time: now,
            fps: 0,
            run_started: now,
            input_manager: InputManager::new(reports_release),
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        log::info!("entering game loop");
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            self.input_manager.poll_events(self.simulation.state())?;
            self.process_actions();

            let input = self.input_manager.sample(now);
            let events = self.simulation.advance(frame_time.as_secs_f64(), &input);
            self.handle_events(&events);

            terminal.draw(|frame| {
                let view = RenderView::new(&self.simulation, frame.area(), self.fps);
                self.renderer.render(frame, &view);
            })?;

            std::thread::sleep(FRAME_SLEEP);
        }
        log::info!("leaving game loop");
        Ok(())
    }

    fn process_actions(&mut self) {
        let actions = self.input_manager.actions().to_vec();
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Restart => {
                    self.simulation.restart();
                    self.input_manager.release_all();
                    self.run_started = Instant::now();
                }
            }
        }
    }

    fn handle_events(&self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ShotFired => log::trace!("shot fired"),
                GameEvent::GameOver { .. } => {
                    let survived = self.run_started.elapsed().as_secs();
                    log::info!("survived {:02}:{:02}", survived / 60, survived % 60);
                }
                GameEvent::EnemyDestroyed { .. } | GameEvent::WaveCleared { .. } => {}
            }
        }
    }
}

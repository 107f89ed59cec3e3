use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::input::{InputAction, InputManager};
use crate::menu::TopMenu;
use crate::renderer::{GameRenderer, RenderView};
use crate::session::GameSession;

/// Never simulate more than this many ticks for one frame, so a stalled
/// terminal does not make the game jump ahead.
const MAX_STEPS_PER_FRAME: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
}

/// The main application: title screen, then one game session at a time.
pub struct App {
    running: bool,
    screen: Screen,
    config: GameConfig,
    menu: TopMenu,
    session: Option<GameSession>,
    /// Wall time not yet turned into session ticks
    lag: Duration,
    last_frame_time: Instant,
    fps: u32,
    input_manager: InputManager,
    renderer: GameRenderer,
    audio: Option<AudioManager>,
    music: Option<PathBuf>,
}

impl App {
    /// `audio` and `music` are optional; without them the game is silent.
    pub fn new(
        config: GameConfig,
        input_manager: InputManager,
        audio: Option<AudioManager>,
        music: Option<PathBuf>,
    ) -> Self {
        Self {
            running: true,
            screen: Screen::Menu,
            config,
            menu: TopMenu::new(),
            session: None,
            lag: Duration::ZERO,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager,
            renderer: GameRenderer::new(),
            audio,
            music,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    screen: self.screen,
                    menu: &self.menu,
                    session: self.session.as_ref(),
                    area: frame.area(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(self.screen)?;
            for action in self.input_manager.get_actions() {
                self.process_action(action)?;
            }

            self.advance(frame_time)?;

            // Small sleep to prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        info!("quitting");
        Ok(())
    }

    /// Steps the session once for every full tick of wall time that passed.
    pub fn advance(&mut self, elapsed: Duration) -> Result<u32> {
        let Some(session) = self.session.as_mut() else {
            return Ok(0);
        };
        if self.screen != Screen::Playing {
            self.lag = Duration::ZERO;
            return Ok(0);
        }

        let tick = Duration::from_millis(self.config.tick_millis);
        self.lag += elapsed;
        let mut steps = 0;
        while self.lag >= tick && steps < MAX_STEPS_PER_FRAME {
            session.step()?;
            self.lag -= tick;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            self.lag = Duration::ZERO;
        }
        Ok(steps)
    }

    /// Process one input action and update the app accordingly.
    pub fn process_action(&mut self, action: InputAction) -> Result<()> {
        match action {
            InputAction::Quit => {
                self.running = false;
            }
            InputAction::MenuKey(key) => {
                self.menu.key_entered(&key);
            }
            InputAction::StartGame => {
                self.start_game()?;
            }
            InputAction::Pause => {
                self.screen = Screen::Paused;
                self.set_music_paused(true);
                debug!("paused");
            }
            InputAction::Resume => {
                self.screen = Screen::Playing;
                self.set_music_paused(false);
                debug!("resumed");
            }
            InputAction::KeyDown(key) => {
                if let Some(session) = self.session.as_mut() {
                    session.key_pressed(&key);
                }
            }
            InputAction::KeyUp(key) => {
                if let Some(session) = self.session.as_mut() {
                    session.key_released(&key);
                }
            }
            InputAction::ProceedToBoss => {
                if let Some(session) = self.session.as_mut() {
                    session.proceed_to_boss()?;
                }
            }
            InputAction::Restart => {
                if let Some(session) = self.session.as_mut() {
                    session.restart()?;
                }
            }
        }
        Ok(())
    }

    fn start_game(&mut self) -> Result<()> {
        let session = GameSession::new(self.config.clone(), self.menu.cheats())?;
        self.session = Some(session);
        self.screen = Screen::Playing;
        self.lag = Duration::ZERO;

        if let (Some(audio), Some(music)) = (self.audio.as_mut(), self.music.as_ref()) {
            audio.play_music_or_warn(music);
        }
        Ok(())
    }

    fn set_music_paused(&self, paused: bool) {
        if let Some(audio) = &self.audio {
            audio.set_paused(paused);
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Terminal frontend: drives a painter3d camera from crossterm key events
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{error, info, trace, warn};
use painter3d_core::{input, Action, Camera, ControlConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Frame pacing and cell geometry for the terminal frontend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalConfig {
    pub target_fps: u32,
    /// Row height relative to column width
    pub cell_aspect: f64,
    /// Seconds of movement applied per key press (terminals report no
    /// key releases, so every press is one discrete step)
    pub key_step: f64,
    pub controls: ControlConfig,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            cell_aspect: 0.5,
            key_step: 0.05,
            controls: ControlConfig::default(),
        }
    }
}

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Camera(Action),
}

/// Map a crossterm key to a command
pub fn command_for(code: KeyCode) -> Option<Command> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('w') => Action::MoveForward,
        KeyCode::Char('s') => Action::MoveBackward,
        KeyCode::Char('a') => Action::MoveLeft,
        KeyCode::Char('d') => Action::MoveRight,
        KeyCode::Char('r') => Action::MoveUp,
        KeyCode::Char('f') => Action::MoveDown,
        KeyCode::Up => Action::PitchUp,
        KeyCode::Down => Action::PitchDown,
        KeyCode::Left => Action::YawLeft,
        KeyCode::Right => Action::YawRight,
        _ => return None,
    };
    Some(Command::Camera(action))
}

/// Frames-per-second estimate refreshed once per second
#[derive(Debug, Clone, Copy)]
struct FrameClock {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FrameClock {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let window = now.duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / window.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
    }
}

/// Owns the scene camera and paints it into the terminal every tick
pub struct TerminalApp {
    camera: Camera,
    config: TerminalConfig,
    renderer: AsciiRenderer,
    running: bool,
    clock: FrameClock,
}

impl TerminalApp {
    pub fn new(camera: Camera, config: TerminalConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            camera,
            config,
            renderer: AsciiRenderer::new(width as usize, height as usize, config.cell_aspect),
            running: true,
            clock: FrameClock::new(Instant::now()),
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.config.target_fps.max(1);
        info!(
            "Starting terminal loop at {} FPS with {} objects",
            self.config.target_fps,
            self.camera.objects().len()
        );

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            if let Some(idle) = target_frame_time.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(idle);
            }
            self.clock.tick(Instant::now());
        }

        Ok(())
    }

    /// Apply one terminal event to the app state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match command_for(code) {
                    Some(Command::Quit) => self.running = false,
                    Some(Command::Camera(action)) => {
                        if let Err(e) = input::apply(
                            &mut self.camera,
                            action,
                            self.config.key_step,
                            &self.config.controls,
                        ) {
                            warn!("Ignoring {:?}: {}", action, e);
                        }
                    }
                    None => {}
                }
            }
            Event::Resize(width, height) => {
                trace!("Resized to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if let Err(e) = self.camera.render(&mut self.renderer) {
            error!("Dropping frame: {}", e);
            return Ok(());
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let frame = self.camera.frame();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "painter3d | FPS: {:.1} | pos {} | fwd {} | WASD/RF=Move Arrows=Turn Q=Quit",
                self.clock.fps, frame.center, frame.forward
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

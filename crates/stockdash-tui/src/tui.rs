//! Terminal session guard plus panic-safe restore.

use std::io::{self, Stdout};

use color_eyre::eyre::Result;
use crossterm::{cursor, execute, terminal};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

/// Owns the terminal while the dashboard runs. Raw mode and the alternate
/// screen are held from [`open`](Self::open) until drop.
pub struct Session {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Session {
    pub fn open() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
            leave();
            return Err(e.into());
        }

        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, paint: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(paint)?;
        Ok(())
    }

    /// Width and height in cells.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        self.terminal.size().ok().map(|s| (s.width, s.height))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        leave();
    }
}

/// Undo everything `Session::open` did. Errors are swallowed since this also
/// runs from the panic hook.
fn leave() {
    let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// color-eyre report and panic hooks. A panic first hands the terminal back
/// so the report is readable.
pub fn install_hooks() -> Result<()> {
    let (panic, report) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    report.install()?;

    let panic = panic.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        leave();
        panic(info);
    }));
    Ok(())
}

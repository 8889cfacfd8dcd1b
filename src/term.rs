use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use log::error;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

/// Character buffer a frame is drawn into before it reaches the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Canvas { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|ch| *ch = ' ');
    }

    pub fn get(&self, pos: Coords) -> Option<char> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Writes one character; positions outside the canvas are dropped.
    pub fn print_at(&mut self, pos: Coords, ch: char) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = ch;
        }
    }

    pub fn text_at(&mut self, pos: Coords, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0.saturating_add(i as TermInt), pos.1), ch);
        }
    }

    /// Text centred horizontally on row `y`.
    pub fn centered_text(&mut self, y: TermInt, text: &str) {
        let len = text.chars().count() as TermInt;
        let x = self.width.saturating_sub(len) / 2;
        self.text_at((x, y), text);
    }

    /// A blank-padded box of centred lines in the middle of the canvas.
    pub fn message(&mut self, lines: &[&str]) {
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as TermInt + 2;
        let top_left = (
            (self.width / 2).saturating_sub(msg_width / 2),
            (self.height / 2).saturating_sub(msg_height / 2),
        );

        for y_diff in 0..msg_height {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, top_left.1 + y_diff), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.text_at((top_left.0, top_left.1 + i as TermInt + 1), &padded_line);
        }
    }

    fn index(&self, (x, y): Coords) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }
}

/// Owns the terminal while the game runs and gives it back when dropped,
/// including while unwinding from a panic.
pub struct TermManager {
    stdout: Stdout,
    /// What is currently on screen, to only send changed cells.
    shown: Canvas,
    active: bool,
}

impl TermManager {
    pub fn new() -> std::io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { stdout: stdout(), shown: Canvas::new(width, height), active: false })
    }

    /// A blank canvas matching the current terminal size.
    pub fn canvas(&self) -> std::io::Result<Canvas> {
        let (width, height) = terminal::size()?;
        Ok(Canvas::new(width, height))
    }

    pub fn setup(&mut self) -> std::io::Result<()> {
        // Set first so a half-done setup is still undone
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )
    }

    pub fn restore(&mut self) -> std::io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Waits up to `timeout` for key events and drains whatever is queued.
    pub fn read_key_events(&self, timeout: Duration) -> std::io::Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    /// Sends the cells of `frame` that differ from the last presented frame.
    pub fn present(&mut self, frame: &Canvas) -> std::io::Result<()> {
        if frame.size() != self.shown.size() {
            // Resized: start over from a cleared screen
            queue!(self.stdout, terminal::Clear(ClearType::All))?;
            let (width, height) = frame.size();
            self.shown = Canvas::new(width, height);
        }

        let (width, height) = frame.size();
        for y in 0..height {
            for x in 0..width {
                let ch = frame.get((x, y)).unwrap_or(' ');
                if self.shown.get((x, y)) != Some(ch) {
                    queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
                    self.shown.print_at((x, y), ch);
                }
            }
        }

        self.stdout.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!("Failed to restore terminal: {}", e);
        }
    }
}

use std::io::{self, Stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetSize, SetTitle};
use crossterm::{cursor, execute, queue, terminal};

use crate::grid::{Grid, Position};
use crate::render::Frame;
use crate::TermInt;

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_COLUMNS: TermInt = 2;

const FILLED: &str = "██";
const EMPTY: &str = "  ";
const CELL_COLOR: Color = Color::White;

pub struct TermManager<W: Write = Stdout> {
    out: W,
    grid: Grid,
    last: Option<Frame>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: (TermInt, TermInt),
    width: TermInt,
    height: TermInt,
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W, grid: Grid) -> Self {
        TermManager { out, grid, last: None, current_msg: None }
    }

    /// Terminal size needed to show the whole grid, in (columns, rows).
    pub fn size(&self) -> (TermInt, TermInt) {
        (self.grid.width() as TermInt * CELL_COLUMNS, self.grid.height() as TermInt)
    }

    /// Takes over the terminal. On failure whatever was already switched is
    /// switched back before the error is returned.
    pub fn setup(&mut self, title: &str) -> io::Result<()> {
        let res = self.enter(title);
        if res.is_err() {
            if let Err(e) = self.restore() {
                log::warn!("Could not restore terminal after failed setup: {}", e);
            }
        }
        res
    }

    fn enter(&mut self, title: &str) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking, SetTitle(title))?;

        let (cols, rows) = self.size();
        if let Err(e) = execute!(self.out, SetSize(cols, rows)) {
            log::warn!("Could not resize terminal to {}x{}: {}", cols, rows, e);
        }

        self.clear()
    }

    /// Every step is attempted; the first error is returned.
    pub fn restore(&mut self) -> io::Result<()> {
        let raw = terminal::disable_raw_mode();
        let screen = execute!(self.out, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
        raw.and(screen)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.last = None;
        execute!(self.out, ResetColor, terminal::Clear(ClearType::All))
    }

    /// Draws `frame`, writing only the cells that changed since the last
    /// presented frame.
    pub fn present(&mut self, frame: Frame) -> io::Result<()> {
        queue!(self.out, SetForegroundColor(CELL_COLOR))?;

        let changes: Vec<(Position, bool)> = frame.changes_since(self.last.as_ref()).collect();
        for (pos, filled) in changes {
            self.print_cell(pos, if filled { FILLED } else { EMPTY })?;
        }

        self.last = Some(frame);
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let (cols, rows) = self.size();
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as TermInt + 2;
        let top_left = (
            (cols / 2).saturating_sub(msg_width / 2),
            (rows / 2).saturating_sub(msg_height / 2),
        );

        queue!(self.out, ResetColor)?;

        // Blank top and bottom rows frame the text
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.out, cursor::MoveTo(top_left.0, y), Print(" ".repeat(msg_width as usize)))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.out, cursor::MoveTo(top_left.0, y), Print(padded))?;
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    /// Blanks the message box; the next `present` redraws what was under it.
    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        let blank = " ".repeat(msg.width as usize);
        for y_diff in 0..msg.height {
            queue!(self.out, cursor::MoveTo(msg.top_left.0, msg.top_left.1 + y_diff), Print(&blank))?;
        }

        // Cells under the box are no longer on screen
        self.last = self.last.take().map(|prev| {
            let mut cleared = Frame::new(*prev.grid());
            for pos in prev.grid().cells() {
                if prev.is_filled(pos) && !msg.covers(pos) {
                    cleared.fill(pos);
                }
            }
            cleared
        });

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_cell(&mut self, pos: Position, glyph: &str) -> io::Result<()> {
        let col = pos.x as TermInt * CELL_COLUMNS;
        queue!(self.out, cursor::MoveTo(col, pos.y as TermInt), Print(glyph))
    }
}

impl Message {
    /// True when the box overlaps any terminal column of the grid cell.
    fn covers(&self, pos: Position) -> bool {
        let (x0, y0) = self.top_left;
        let col = pos.x as TermInt * CELL_COLUMNS;
        let row = pos.y as TermInt;
        row >= y0 && row < y0 + self.height && col + CELL_COLUMNS > x0 && col < x0 + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(term: TermManager<Vec<u8>>) -> String {
        String::from_utf8(term.into_inner()).unwrap()
    }

    /// Accepts everything except writes containing `reject`.
    struct RejectingWriter {
        buf: Vec<u8>,
        reject: &'static [u8],
    }

    impl Write for RejectingWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if data.windows(self.reject.len()).any(|w| w == self.reject) {
                return Err(io::Error::new(io::ErrorKind::Other, "rejected"));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_setup_leaves_alternate_screen() {
        // Setting the title fails, after the alternate screen was entered
        let out = RejectingWriter { buf: Vec::new(), reject: b"\x1b]0;" };
        let mut term = TermManager::new(out, Grid::new(10, 6));

        assert!(term.setup("cobrita").is_err());

        let written = String::from_utf8(term.into_inner().buf).unwrap();
        assert!(written.contains("\x1b[?1049h"));
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn test_size_doubles_columns() {
        let term = TermManager::new(Vec::new(), Grid::new(40, 30));
        assert_eq!(term.size(), (80, 30));
    }

    #[test]
    fn test_present_only_writes_changes() {
        let grid = Grid::new(4, 3);
        let mut term = TermManager::new(Vec::new(), grid);

        let mut frame = Frame::new(grid);
        frame.fill(Position::new(1, 1));
        term.present(frame.clone()).unwrap();
        let first = output(term);
        assert_eq!(first.matches(FILLED).count(), 1);

        let mut term = TermManager::new(Vec::new(), grid);
        term.present(frame.clone()).unwrap();
        term.out.clear();
        term.present(frame).unwrap();
        let second = output(term);
        assert_eq!(second.matches(FILLED).count(), 0);
    }

    #[test]
    fn test_message_box_roundtrip() {
        let grid = Grid::new(10, 6);
        let mut term = TermManager::new(Vec::new(), grid);
        let mut frame = Frame::new(grid);
        frame.fill(Position::new(5, 3));
        frame.fill(Position::new(0, 0));
        term.present(frame.clone()).unwrap();

        term.show_message(&["Paused"]).unwrap();
        assert!(term.has_message());
        term.hide_message().unwrap();
        assert!(!term.has_message());

        // The cell under the box is drawn again, the one outside it is not
        term.out.clear();
        term.present(frame).unwrap();
        assert_eq!(output(term).matches(FILLED).count(), 1);
    }
}

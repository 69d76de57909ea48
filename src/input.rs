use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Heading;

/// The four directional keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirKey {
    Left,
    Up,
    Down,
    Right,
}

/// Scan order when several directions were pressed during one step.
pub const PRIORITY: [DirKey; 4] = [DirKey::Left, DirKey::Up, DirKey::Down, DirKey::Right];

impl DirKey {
    pub fn heading(self) -> Heading {
        match self {
            DirKey::Left => Heading::Left,
            DirKey::Up => Heading::Up,
            DirKey::Down => Heading::Down,
            DirKey::Right => Heading::Right,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(DirKey),
    TogglePause,
    Quit,
    None,
}

/// Translates a terminal key event. Releases are ignored, repeats count as
/// presses.
pub fn command_for(ev: &KeyEvent) -> Command {
    if ev.kind == KeyEventKind::Release {
        return Command::None;
    }

    if is_ctrl_c(ev) {
        return Command::Quit;
    }

    match ev.code {
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Turn(DirKey::Left),
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Turn(DirKey::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Turn(DirKey::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Turn(DirKey::Right),
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
        KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        _ => Command::None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Directional keys seen since the last simulation step. A terminal only
/// reports presses, so "held during this step" means "pressed since the
/// previous one".
// TODO: terminals supporting the kitty protocol can report real key state via
// `PushKeyboardEnhancementFlags(REPORT_EVENT_TYPES)`; track press/release
// there and sample what is held at step time.
#[derive(Debug, Default, Clone)]
pub struct KeySampler {
    pressed: [bool; 4],
}

impl KeySampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: DirKey) {
        self.pressed[key.slot()] = true;
    }

    pub fn is_pressed(&self, key: DirKey) -> bool {
        self.pressed[key.slot()]
    }

    /// Heading for the first pressed key in `PRIORITY` order, `None` when no
    /// direction was pressed. Clears the sample.
    pub fn take_turn(&mut self) -> Option<Heading> {
        let turn = PRIORITY.iter().find(|key| self.is_pressed(**key)).map(|key| key.heading());
        self.clear();
        turn
    }

    pub fn clear(&mut self) {
        self.pressed = [false; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_wasd_and_arrows() {
        assert_eq!(command_for(&key(KeyCode::Char('a'))), Command::Turn(DirKey::Left));
        assert_eq!(command_for(&key(KeyCode::Char('W'))), Command::Turn(DirKey::Up));
        assert_eq!(command_for(&key(KeyCode::Down)), Command::Turn(DirKey::Down));
        assert_eq!(command_for(&key(KeyCode::Right)), Command::Turn(DirKey::Right));
        assert_eq!(command_for(&key(KeyCode::Char('x'))), Command::None);
    }

    #[test]
    fn test_controls() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for(&ctrl_c), Command::Quit);
        assert_eq!(command_for(&key(KeyCode::Char('c'))), Command::None);
        assert_eq!(command_for(&key(KeyCode::Char('q'))), Command::Quit);
        assert_eq!(command_for(&key(KeyCode::Esc)), Command::TogglePause);
        assert_eq!(command_for(&key(KeyCode::Char('p'))), Command::TogglePause);
    }

    #[test]
    fn test_release_ignored() {
        let mut ev = key(KeyCode::Char('d'));
        ev.kind = KeyEventKind::Release;
        assert_eq!(command_for(&ev), Command::None);
    }

    #[test]
    fn test_no_keys_keeps_heading() {
        let mut sampler = KeySampler::new();
        assert_eq!(sampler.take_turn(), None);
    }

    #[test]
    fn test_priority_order() {
        let mut sampler = KeySampler::new();
        sampler.press(DirKey::Up);
        sampler.press(DirKey::Left);
        assert_eq!(sampler.take_turn(), Some(Heading::Left));

        sampler.press(DirKey::Right);
        sampler.press(DirKey::Down);
        sampler.press(DirKey::Up);
        assert_eq!(sampler.take_turn(), Some(Heading::Up));

        sampler.press(DirKey::Right);
        sampler.press(DirKey::Left);
        assert_eq!(sampler.take_turn(), Some(Heading::Left));

        sampler.press(DirKey::Right);
        sampler.press(DirKey::Down);
        assert_eq!(sampler.take_turn(), Some(Heading::Down));
    }

    #[test]
    fn test_take_turn_clears() {
        let mut sampler = KeySampler::new();
        sampler.press(DirKey::Right);
        assert_eq!(sampler.take_turn(), Some(Heading::Right));
        assert!(!sampler.is_pressed(DirKey::Right));
        assert_eq!(sampler.take_turn(), None);
    }
}

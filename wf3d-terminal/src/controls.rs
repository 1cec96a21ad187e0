/// Keyboard and mouse-drag mapping onto view operations
use crossterm::event::KeyCode;
use wf3d_core::{Result, ViewContext};

/// Degrees per rotate keypress
pub const ROTATE_STEP: f64 = 10.0;
/// Field of view change per keypress
pub const FOV_STEP: f64 = 10.0;
/// Zoom factor per keypress
pub const ZOOM_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Translate(f64, f64),
    Scale(f64),
    Rotate(f64),
    HOrbit(f64),
    VOrbit(f64),
    AdjustFov(f64),
    Reset,
    Undo,
    Load,
    ToggleHelp,
    Quit,
}

impl Command {
    /// Whether the command changes the view (and so needs a redraw)
    pub fn is_view_op(&self) -> bool {
        !matches!(self, Command::Load | Command::ToggleHelp | Command::Quit)
    }

    /// Run a view command. Non-view commands are a no-op here.
    pub fn apply(&self, view: &mut ViewContext) -> Result<()> {
        match *self {
            Command::Translate(dx, dy) => view.translate(dx, dy),
            Command::Scale(f) => view.scale(f, f),
            Command::Rotate(deg) => view.rotate(deg),
            Command::HOrbit(deg) => view.h_orbit(deg),
            Command::VOrbit(deg) => view.v_orbit(deg),
            Command::AdjustFov(delta) => view.adjust_fov(delta),
            Command::Reset => {
                view.reset();
                Ok(())
            }
            Command::Undo => view.undo().map(|_| ()),
            Command::Load | Command::ToggleHelp | Command::Quit => Ok(()),
        }
    }
}

pub const HELP: &[&str] = &[
    "arrows  translate          = / -  scale by 2 / 0.5",
    ", / .   rotate -10 / +10   r      reset transforms",
    "u       undo last edit     z / x  field of view +10 / -10",
    "a / d   orbit left/right   w / s  orbit up/down",
    "drag    orbit              l      reload model",
    "?       toggle help        q      quit",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keymap {
    /// Device pixels per translate keypress
    pub step: f64,
    /// Degrees per orbit keypress
    pub orbit_step: f64,
}

impl Keymap {
    pub fn command_for(&self, code: KeyCode) -> Option<Command> {
        let command = match code {
            KeyCode::Left => Command::Translate(-self.step, 0.0),
            KeyCode::Right => Command::Translate(self.step, 0.0),
            KeyCode::Up => Command::Translate(0.0, -self.step),
            KeyCode::Down => Command::Translate(0.0, self.step),
            KeyCode::Char('=') | KeyCode::Char('+') => Command::Scale(ZOOM_FACTOR),
            KeyCode::Char('-') => Command::Scale(1.0 / ZOOM_FACTOR),
            KeyCode::Char(',') => Command::Rotate(-ROTATE_STEP),
            KeyCode::Char('.') => Command::Rotate(ROTATE_STEP),
            KeyCode::Char('r') => Command::Reset,
            KeyCode::Char('u') => Command::Undo,
            KeyCode::Char('z') => Command::AdjustFov(FOV_STEP),
            KeyCode::Char('x') => Command::AdjustFov(-FOV_STEP),
            KeyCode::Char('a') => Command::HOrbit(-self.orbit_step),
            KeyCode::Char('d') => Command::HOrbit(self.orbit_step),
            KeyCode::Char('w') => Command::VOrbit(-self.orbit_step),
            KeyCode::Char('s') => Command::VOrbit(self.orbit_step),
            KeyCode::Char('l') | KeyCode::Char('L') => Command::Load,
            KeyCode::Char('?') | KeyCode::Char('h') => Command::ToggleHelp,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            step: 20.0,
            orbit_step: 5.0,
        }
    }
}

/// Turns mouse drags into orbit steps.
///
/// Once the pointer has moved more than `sensitivity` cells away from the
/// anchor along an axis, one orbit of `amount` degrees is emitted for that
/// axis and only that axis is re-anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTracker {
    pub sensitivity: i32,
    pub amount: f64,
    anchor: Option<(i32, i32)>,
}

impl DragTracker {
    pub fn new(sensitivity: i32, amount: f64) -> Self {
        Self {
            sensitivity,
            amount,
            anchor: None,
        }
    }

    pub fn press(&mut self, x: i32, y: i32) {
        self.anchor = Some((x, y));
    }

    pub fn release(&mut self) {
        self.anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn drag(&mut self, x: i32, y: i32) -> Vec<Command> {
        let Some((x0, y0)) = self.anchor else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        let (mut ax, mut ay) = (x0, y0);
        let (dx, dy) = (x - x0, y - y0);

        if dx > self.sensitivity {
            commands.push(Command::HOrbit(self.amount));
            ax = x;
        } else if dx < -self.sensitivity {
            commands.push(Command::HOrbit(-self.amount));
            ax = x;
        }

        if dy > self.sensitivity {
            commands.push(Command::VOrbit(self.amount));
            ay = y;
        } else if dy < -self.sensitivity {
            commands.push(Command::VOrbit(-self.amount));
            ay = y;
        }

        self.anchor = Some((ax, ay));
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf3d_core::{ViewConfig, ViewError};

    #[test]
    fn test_keymap() {
        let keymap = Keymap::default();
        assert_eq!(keymap.command_for(KeyCode::Right), Some(Command::Translate(20.0, 0.0)));
        assert_eq!(keymap.command_for(KeyCode::Up), Some(Command::Translate(0.0, -20.0)));
        assert_eq!(keymap.command_for(KeyCode::Char('-')), Some(Command::Scale(0.5)));
        assert_eq!(keymap.command_for(KeyCode::Char('.')), Some(Command::Rotate(10.0)));
        assert_eq!(keymap.command_for(KeyCode::Char('x')), Some(Command::AdjustFov(-10.0)));
        assert_eq!(keymap.command_for(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(keymap.command_for(KeyCode::Char('#')), None);
    }

    #[test]
    fn test_view_ops() {
        assert!(Command::Scale(2.0).is_view_op());
        assert!(Command::Reset.is_view_op());
        assert!(Command::Undo.is_view_op());
        assert!(!Command::Load.is_view_op());
        assert!(!Command::ToggleHelp.is_view_op());
        assert!(!Command::Quit.is_view_op());
    }

    #[test]
    fn test_apply_drives_view() {
        let mut view = ViewContext::new(ViewConfig::default()).unwrap();
        Command::Scale(2.0).apply(&mut view).unwrap();
        Command::HOrbit(30.0).apply(&mut view).unwrap();
        Command::AdjustFov(10.0).apply(&mut view).unwrap();
        assert_eq!(view.history().len(), 1);
        assert!((view.orbit_angles().0 - 30f64.to_radians()).abs() < 1e-12);
        assert_eq!(view.field_of_view(), 1010.0);

        Command::Undo.apply(&mut view).unwrap();
        assert!(view.history().is_empty());
        assert_eq!(Command::Undo.apply(&mut view), Err(ViewError::EmptyHistory));
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut tracker = DragTracker::new(1, 5.0);
        assert!(tracker.drag(40, 40).is_empty());
    }

    #[test]
    fn test_drag_emits_orbits() {
        let mut tracker = DragTracker::new(1, 5.0);
        tracker.press(10, 10);

        // within sensitivity
        assert!(tracker.drag(11, 9).is_empty());

        assert_eq!(tracker.drag(13, 10), vec![Command::HOrbit(5.0)]);
        // x re-anchored at 13, y still anchored at 10
        assert_eq!(tracker.drag(13, 7), vec![Command::VOrbit(-5.0)]);
        assert_eq!(
            tracker.drag(10, 10),
            vec![Command::HOrbit(-5.0), Command::VOrbit(5.0)]
        );

        tracker.release();
        assert!(!tracker.is_dragging());
        assert!(tracker.drag(0, 0).is_empty());
    }
}

/// Terminal-based wireframe viewer driving the wf3d view transforms
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use wf3d_core::{stl, Mesh, ViewContext, ViewError};

pub mod cli;
pub mod controls;
pub mod renderer;

pub use cli::CliArgs;
pub use controls::{Command, DragTracker, Keymap};
pub use renderer::{CellSize, WireframeRenderer};

/// Length of the axes drawn alongside every model
pub const AXIS_LENGTH: f64 = 100.0;

/// Cube edge length shown when no model is given
pub const DEFAULT_CUBE_SIZE: f64 = 100.0;

/// Build the mesh to display: the STL at `path` (or a cube), plus axes
pub fn load_model(path: Option<&PathBuf>, with_axes: bool) -> Result<Mesh, stl::StlError> {
    let mut mesh = match path {
        Some(path) => stl::load_stl(path)?,
        None => Mesh::cube(DEFAULT_CUBE_SIZE),
    };
    if with_axes {
        mesh.extend(Mesh::axes(AXIS_LENGTH));
    }
    Ok(mesh)
}

/// Main application struct for terminal wireframe viewing
pub struct TerminalApp {
    mesh: Mesh,
    view: ViewContext,
    renderer: WireframeRenderer,
    keymap: Keymap,
    drag: DragTracker,
    model_path: Option<PathBuf>,
    with_axes: bool,
    show_help: bool,
    status: Option<String>,
    running: bool,
    dirty: bool,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, args: &CliArgs) -> Result<Self, ViewError> {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        // last row is the status line
        let rows = rows.saturating_sub(1).max(1);

        Ok(Self {
            mesh,
            view: ViewContext::new(args.view_config(cols, rows))?,
            renderer: WireframeRenderer::new(cols as usize, rows as usize, args.cell_size()),
            keymap: args.keymap(),
            drag: args.drag_tracker(),
            model_path: args.model.clone(),
            with_axes: !args.no_axes,
            show_help: false,
            status: None,
            running: true,
            dirty: true,
        })
    }

    pub fn view(&self) -> &ViewContext {
        &self.view
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            if event::poll(Duration::from_millis(50))? {
                let event = event::read()?;
                self.handle_event(event);
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the view
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match self.keymap.command_for(code) {
                    Some(command) => self.execute(command),
                    None => self.show_help = true,
                }
                self.dirty = true;
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.drag.press(column as i32, row as i32)
                }
                MouseEventKind::Up(MouseButton::Left) => self.drag.release(),
                MouseEventKind::Drag(MouseButton::Left) => {
                    for command in self.drag.drag(column as i32, row as i32) {
                        self.execute(command);
                    }
                }
                _ => {}
            },
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
    }

    pub fn execute(&mut self, command: Command) {
        if command.is_view_op() {
            self.status = command.apply(&mut self.view).err().map(|e| e.to_string());
        } else {
            match command {
                Command::Quit => self.running = false,
                Command::ToggleHelp => self.show_help = !self.show_help,
                Command::Load => self.reload(),
                _ => {}
            }
        }
        self.dirty = true;
    }

    /// Rebuild the grid and keep the pivot in the middle of the new canvas
    fn resize(&mut self, cols: u16, rows: u16) {
        let rows = rows.saturating_sub(1).max(1);
        self.renderer = WireframeRenderer::new(cols as usize, rows as usize, self.renderer.cell());
        if let Err(err) = self.view.set_screen_center(self.renderer.canvas_center()) {
            self.status = Some(err.to_string());
        }
        self.dirty = true;
    }

    fn reload(&mut self) {
        match load_model(self.model_path.as_ref(), self.with_axes) {
            Ok(mesh) => {
                info!(triangles = mesh.triangles.len(), "reloaded model");
                self.mesh = mesh;
                self.status = None;
            }
            Err(err) => {
                warn!(%err, "failed to reload model");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &self.view);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        if self.show_help {
            for (i, line) in controls::HELP.iter().enumerate() {
                queue!(
                    stdout,
                    cursor::MoveTo(0, i as u16),
                    SetForegroundColor(Color::Yellow),
                    Print(line),
                    ResetColor
                )?;
            }
        }

        let (h, v) = self.view.orbit_angles();
        let mut line = format!(
            "WF3D | FOV {:.0} | orbit h {:.0}° v {:.0}° | edits {} | ? help, q quit",
            self.view.field_of_view(),
            h.to_degrees(),
            v.to_degrees(),
            self.view.history().len(),
        );
        if let Some(status) = &self.status {
            line.push_str(" | ");
            line.push_str(status);
        }
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(if self.status.is_some() { Color::Red } else { Color::Yellow }),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use nalgebra::Point2;

    fn app() -> TerminalApp {
        let args = CliArgs::default();
        TerminalApp::new(load_model(None, true).unwrap(), &args).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_default_model_has_axes() {
        let mesh = load_model(None, true).unwrap();
        assert_eq!(mesh.triangles.len(), 15);
        assert_eq!(load_model(None, false).unwrap().triangles.len(), 12);
    }

    #[test]
    fn test_keys_drive_view() {
        let mut app = app();
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Char('=')));
        assert_eq!(app.view().history().len(), 2);

        app.handle_event(key(KeyCode::Char('r')));
        assert!(app.view().history().is_empty());

        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_degenerate_input_sets_status() {
        let mut app = app();
        for _ in 0..100 {
            app.handle_event(key(KeyCode::Char('x')));
        }
        assert!(app.status().is_some());
        assert!(app.view().field_of_view() > 0.0);
        assert!(app.is_running());

        app.handle_event(key(KeyCode::Char('z')));
        assert!(app.status().is_none());
    }

    #[test]
    fn test_mouse_drag_orbits() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 15, 10));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 15, 10));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 30));

        let (h, v) = app.view().orbit_angles();
        assert!((h - 5f64.to_radians()).abs() < 1e-12);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_resize_recenters_view() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('=')));
        app.handle_event(Event::Resize(120, 41));

        assert_eq!(app.renderer.width(), 120);
        assert_eq!(app.renderer.height(), 40);
        assert_eq!(app.view().screen_center(), Point2::new(480.0, 320.0));
        assert_eq!(app.view().history().len(), 1);
        assert!(app.status().is_none());
    }

    #[test]
    fn test_missing_model_reload_reports() {
        let args = CliArgs {
            model: Some(PathBuf::from("/nonexistent/wf3d/model.stl")),
            ..CliArgs::default()
        };
        let mut app = TerminalApp::new(Mesh::cube(10.0), &args).unwrap();
        app.execute(Command::Load);
        assert!(app.status().is_some());
        assert!(app.is_running());
    }
}

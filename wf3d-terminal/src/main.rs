/// WF3D Terminal Viewer
///
/// Loads an STL model (or a cube) and lets you scale, rotate, translate and
/// orbit it as a perspective wireframe.
/// Controls:
///   - Arrow Keys: Translate
///   - = / -: Scale, , / .: Rotate
///   - Mouse drag or WASD: Orbit
///   - Z/X: Field of view, U: Undo, R: Reset
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wf3d_terminal::{load_model, CliArgs, TerminalApp};

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let mesh = load_model(args.model.as_ref(), !args.no_axes).with_context(|| match &args.model {
        Some(path) => format!("failed to load model {}", path.display()),
        None => "failed to build default model".to_string(),
    })?;
    info!(triangles = mesh.triangles.len(), "model ready");

    let mut app = TerminalApp::new(mesh, &args).context("invalid view configuration")?;
    app.run().context("terminal session failed")?;
    Ok(())
}

/// Logs go to stderr; redirect it (`2>wf3d.log`) when raising RUST_LOG
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

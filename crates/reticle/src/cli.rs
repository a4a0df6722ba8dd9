use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "reticle",
    author,
    version,
    about = "Windowed OpenGL crosshair demo",
    arg_required_else_help = false
)]
pub struct RunArgs {
    /// Override the window resolution (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Start in borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Disable vsync for this run.
    #[arg(long)]
    pub no_vsync: bool,

    /// Use an explicit configuration directory instead of the per-user one.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Sleep inserted after every frame, in milliseconds.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 1)]
    pub frame_delay_ms: u64,
}

pub fn parse() -> RunArgs {
    RunArgs::parse()
}

/// Parses a `WIDTHxHEIGHT` argument into a non-zero pixel size.
pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let mut parts = value.split(['x', 'X']);
    let (Some(raw_width), Some(raw_height), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected WIDTHxHEIGHT, got '{value}'"));
    };

    let width: u32 = raw_width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{raw_width}'"))?;
    let height: u32 = raw_height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{raw_height}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("surface size must be non-zero, got '{value}'"));
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_parses_both_separators() {
        assert_eq!(parse_surface_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_surface_size("640X480"), Ok((640, 480)));
    }

    #[test]
    fn surface_size_rejects_malformed_input() {
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("1280x720x1").is_err());
        assert!(parse_surface_size("widex720").is_err());
        assert!(parse_surface_size("0x720").is_err());
    }
}

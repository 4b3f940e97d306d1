mod commands;
mod core;
mod release;
mod ui;

use clap::Parser;
use crate::core::context::ProjectContext;
use crate::core::error::{ReleaseError, print_error};

/// Cross-compile the application for its release targets
#[derive(Parser)]
#[command(name = "release-build")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Build for all platforms (default: primary target only)
  #[arg(short = 'a', long = "all")]
  build_all: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let ctx = match ProjectContext::build(&project_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  if let Err(err) = commands::run_build(&ctx, cli.build_all) {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

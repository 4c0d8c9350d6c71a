//! Output helpers shared by the commands.
//!
//! Results go to stdout as pretty JSON. Validation failures are rendered as
//! diagnostics: through the terminal renderer on stderr, or as a JSON array
//! on stdout when `--format json` is set.

use serde::Serialize;
use tessel_blocks::BlockError;
use tessel_diagnostics::{DiagnosticRenderer, TerminalRenderer};

use crate::{GlobalArgs, ReportFormat};

/// Prints `value` as pretty JSON and returns the success exit code.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> Result<i32, Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}

/// Renders a pipeline error and returns the failure exit code.
pub fn fail(err: &BlockError, global: &GlobalArgs) -> i32 {
    let diag = err.to_diagnostic();
    match global.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            eprint!("{}", renderer.render(&diag));
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&[&diag]).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
    1
}

/// Turns a pipeline result into an exit code, printing whichever side it holds.
pub fn finish<T: Serialize>(
    result: Result<T, BlockError>,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    match result {
        Ok(value) => emit(&value),
        Err(err) => Ok(fail(&err, global)),
    }
}

/// Prints a status line unless `--quiet` is set.
pub fn status(global: &GlobalArgs, verb: &str, what: &str) {
    if !global.quiet {
        eprintln!("{verb:>12} {what}");
    }
}

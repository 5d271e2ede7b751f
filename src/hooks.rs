//! Post-resolution command hooks
//!
//! After a manifest has been analyzed (and possibly rewritten), the caller
//! may want to reinstall dependencies and rebuild against the new pins.
//! Failures here are reported, never fatal.

use std::process::Command;

use tracing::{debug, info};

use crate::config::CommandSpec;

/// Run the install command (if any), then the build command (if any).
///
/// Returns false as soon as one of them fails; the install step is a
/// prerequisite for the build step.
pub fn run_post_commands(install: Option<&CommandSpec>, build: Option<&CommandSpec>) -> bool {
    if let Some(spec) = install {
        info!("installing dependencies... (this may take a while)");
        if let Err(output) = run_command(spec) {
            info!("install command failed: {output}");
            return false;
        }
    }
    if let Some(spec) = build {
        info!("building... (this may take a while)");
        if let Err(output) = run_command(spec) {
            info!("build command failed: {output}");
            return false;
        }
    }
    true
}

/// Run one command, returning its combined output as the error on failure.
fn run_command(spec: &CommandSpec) -> Result<(), String> {
    let mut cmd = Command::new(&spec.program);
    if let Some(args) = &spec.args {
        cmd.args(args.split_whitespace());
    }
    if let Some(dir) = &spec.dir {
        cmd.current_dir(dir);
    }
    debug!("running command {:?}", cmd);
    let output = cmd.output().map_err(|err| err.to_string())?;
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    debug!("got output {combined}");
    if !output.status.success() {
        return Err(combined);
    }
    Ok(())
}

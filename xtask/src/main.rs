//! Build automation tasks for scene-viewer
//!
//! Usage:
//!   cargo xtask dist                      # Release build + assets into dist/<platform>/
//!   cargo xtask dist --platform windows   # Name the output folder explicitly

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const BINARY: &str = "scene-viewer";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for scene-viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a native release and copy it with its assets into dist/
    Dist {
        /// Target platform: windows, macos, linux (defaults to host)
        #[arg(long)]
        platform: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dist { platform } => dist(platform),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the project root")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

fn host_platform() -> String {
    if cfg!(target_os = "windows") {
        "windows".to_string()
    } else if cfg!(target_os = "macos") {
        "macos".to_string()
    } else {
        "linux".to_string()
    }
}

/// Native release build, packaged with assets and an optional viewer.ron
fn dist(platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(host_platform);
    let dist = root.join("dist").join(&platform);

    println!("Building native release for {}...", platform);
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--bin", BINARY]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    let binary_name = if platform == "windows" {
        format!("{}.exe", BINARY)
    } else {
        BINARY.to_string()
    };
    std::fs::copy(
        root.join("target/release").join(&binary_name),
        dist.join(&binary_name),
    )
    .with_context(|| format!("Missing release binary {}", binary_name))?;

    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))
        .context("Failed to copy assets/")?;

    let config = root.join("viewer.ron");
    if config.exists() {
        std::fs::copy(&config, dist.join("viewer.ron"))?;
    }

    println!("Build complete: dist/{}/", platform);
    Ok(())
}

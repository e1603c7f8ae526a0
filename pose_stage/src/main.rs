//! pose_stage — interactive entry point.

use anyhow::Result;
use pose_stage::app::{run, SourceMode};
use pose_stage::config::StageConfig;

const CONFIG_PATH: &str = "pose_stage.toml";

fn main() -> Result<()> {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Pose Stage — gesture-to-animation controller          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--write-config") {
        StageConfig::default().save(CONFIG_PATH)?;
        println!("  Wrote defaults to {}", CONFIG_PATH);
        return Ok(());
    }

    let cfg = match StageConfig::load(CONFIG_PATH) {
        Ok(cfg) => {
            println!("  Config: {}", CONFIG_PATH);
            cfg
        }
        Err(_) => {
            println!("  Config: built-in defaults  (--write-config to customise)");
            StageConfig::default()
        }
    };

    let mode = if args.iter().any(|a| a == "--scripted") {
        println!("  Source: scripted demo loop");
        SourceMode::Scripted
    } else {
        println!("  Source: keyboard-posed skeleton");
        println!("          U=hands up  J=hands down  T=t pose  N=neutral  O=occlude  Q=quit");
        SourceMode::Interactive
    };

    println!();
    println!("  Opening stage window…");
    println!();

    run(cfg, mode)
}

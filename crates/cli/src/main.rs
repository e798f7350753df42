//! open-afx CLI: command-line lighting control tool.

use anyhow::Result;
use clap::{Parser, Subcommand};
use open_afx_core::controller::Rgb;

#[derive(Parser)]
#[command(
    name = "open-afx",
    version,
    about = "Open-source AlienFX lighting control"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered lighting controllers.
    ListDevices,
    /// Set one zone's color on every discovered controller.
    SetColor {
        /// Zero-based zone index.
        zone: u32,
        red: u8,
        green: u8,
        blue: u8,
    },
    /// Apply a global brightness level on every controller.
    SetBrightness {
        /// Brightness, 0 (off) to 255 (full).
        level: u8,
    },
    /// Reset every controller to a known state.
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut controllers = open_afx_core::discover::discover()?;
    if controllers.is_empty() {
        println!("No AlienFX lighting controllers found.");
        return Ok(());
    }

    match cli.command {
        Commands::ListDevices => {
            for dev in &controllers {
                println!("{}", dev.identity());
            }
        }
        Commands::SetColor {
            zone,
            red,
            green,
            blue,
        } => {
            for dev in controllers.iter_mut() {
                dev.set_color(zone, Rgb::new(red, green, blue))?;
                println!("{}: zone {zone} set to #{red:02X}{green:02X}{blue:02X}", dev.identity());
            }
        }
        Commands::SetBrightness { level } => {
            for dev in controllers.iter_mut() {
                dev.set_brightness(level)?;
                println!("{}: brightness {level}", dev.identity());
            }
        }
        Commands::Reset => {
            for dev in controllers.iter_mut() {
                dev.reset()?;
                println!("{}: reset", dev.identity());
            }
        }
    }

    Ok(())
}

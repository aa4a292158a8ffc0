//! # Rastro CLI
//!
//! Command-line front end for the band-encoding pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # List built-in device profiles
//! rastro profiles
//!
//! # Encode an image for an Epson 9-pin, write the escape-code stream
//! rastro print --profile epson9 --out page.prn input.png
//!
//! # Color page for an ImageWriter II, specific resolution mode
//! rastro print --profile iwhic --mode 160x144 --out page.prn input.png
//!
//! # Slow but straight: unidirectional head motion
//! rastro print --profile epson24 --unidirectional --out page.prn input.png
//! ```
//!
//! The input image is converted at 1 image pixel = 1 device dot;
//! grayscale coverage becomes dots through Bayer 8×8 ordered dithering,
//! and color devices get a max-black CMYK separation first.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rastro::{
    render::{cmyk_raster_from_image, raster_from_image},
    Capabilities, DeviceProfile, PageDriver, RastroError,
};

/// Rastro - escape-code printer encoding utility
#[derive(Parser, Debug)]
#[command(name = "rastro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode an image into a printer byte stream
    Print {
        /// Input image (any format the image crate reads)
        input: PathBuf,

        /// Device profile name (see `rastro profiles`)
        #[arg(long)]
        profile: String,

        /// Output file for the escape-code stream
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Resolution mode as XxY dpi (defaults to the profile's first mode)
        #[arg(long, value_name = "XxY")]
        mode: Option<String>,

        /// JSON page-setup descriptor overriding the derived one
        /// (resolution, margins, bin; see `Capabilities`)
        #[arg(long, value_name = "FILE")]
        setup: Option<PathBuf>,

        /// Permit margins below the 0.25" hardware safety minimum
        #[arg(long)]
        unsafe_margins: bool,

        /// Print unidirectionally for better vertical registration
        #[arg(long)]
        unidirectional: bool,

        /// Paper bin to feed from, on devices with multiple bins
        #[arg(long)]
        bin: Option<u8>,
    },

    /// List built-in device profiles
    Profiles,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RastroError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Print {
            input,
            profile,
            out,
            mode,
            setup,
            unsafe_margins,
            unidirectional,
            bin,
        } => {
            let profile = DeviceProfile::from_name(&profile).ok_or_else(|| {
                RastroError::Config(format!(
                    "unknown profile '{}' (see `rastro profiles`)",
                    profile
                ))
            })?;

            let (x_dpi, y_dpi) = match mode {
                Some(s) => parse_mode(&s)?,
                None => {
                    let m = profile.default_mode();
                    (m.x_dpi, m.y_dpi)
                }
            };

            let img = image::open(&input)
                .map_err(|e| RastroError::Config(format!("{}: {}", input.display(), e)))?;
            let (width, height) = (img.width(), img.height());

            let (mut raster, derived) = if profile.num_components == 4 {
                (
                    cmyk_raster_from_image(&img),
                    Capabilities::cmyk(x_dpi, y_dpi, width, height),
                )
            } else {
                (
                    raster_from_image(&img),
                    Capabilities::mono(x_dpi, y_dpi, width, height),
                )
            };
            // A JSON descriptor replaces the image-derived setup
            // wholesale; flags still apply on top of either.
            let mut caps = match setup {
                Some(path) => {
                    let file = File::open(&path)?;
                    serde_json::from_reader(file).map_err(|e| {
                        RastroError::Config(format!("{}: {}", path.display(), e))
                    })?
                }
                None => derived,
            };
            caps.unsafe_margins |= unsafe_margins;
            caps.unidirectional |= unidirectional;
            if bin.is_some() {
                caps.bin = bin;
            }

            let file = File::create(&out)?;
            let mut driver = PageDriver::new(profile, caps);
            let summary = driver.print_page(&mut raster, BufWriter::new(file))?;

            for warning in &summary.warnings {
                eprintln!("Warning: {}", warning);
            }
            println!(
                "{}: {} bands, {} bytes -> {}",
                profile.name,
                summary.bands,
                summary.bytes_written,
                out.display()
            );
        }

        Commands::Profiles => {
            println!(
                "{:<10} {:>6} {:>7}  {}",
                "NAME", "COLORS", "PLATEN", "MODES"
            );
            for p in DeviceProfile::built_in() {
                let modes: Vec<String> = p
                    .modes
                    .iter()
                    .map(|m| format!("{}x{}", m.x_dpi, m.y_dpi))
                    .collect();
                println!(
                    "{:<10} {:>6} {:>6}\"  {}",
                    p.name,
                    p.num_components,
                    p.platen_inches,
                    modes.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Parse a `120x72` style resolution pair.
fn parse_mode(s: &str) -> Result<(u32, u32), RastroError> {
    let err = || RastroError::Config(format!("bad mode '{}', expected XxY (e.g. 120x72)", s));
    let (x, y) = s.split_once(['x', 'X']).ok_or_else(err)?;
    Ok((
        x.trim().parse().map_err(|_| err())?,
        y.trim().parse().map_err(|_| err())?,
    ))
}

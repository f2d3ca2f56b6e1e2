// Copyright 2025 Lars Brubaker
// Command-line front end: read sites as JSON, print the clipped diagram.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fortune_dcel::{Bounds, DuplicatePolicy, Options, Voronoi};
use log::{info, warn};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The whole DCEL as JSON.
    Json,
    /// One line per cell: site, then its corners counter-clockwise.
    Polygons,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input file, `{"bounds": [lx, ly, ux, uy], "sites": [[x, y], ...]}`.
    /// Reads stdin when omitted.
    #[clap(value_parser)]
    input: Option<PathBuf>,
    #[clap(long, value_enum, default_value = "json")]
    format: Format,
    /// Fail on repeated sites instead of merging them.
    #[clap(long)]
    reject_duplicates: bool,
    /// Relative tolerance for snapping and event ordering.
    #[clap(long, default_value_t = 1e-9)]
    epsilon: f64,
}

#[derive(Deserialize)]
struct Input {
    bounds: [f64; 4],
    sites: Vec<[f64; 2]>,
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let input: Input = serde_json::from_str(&read_input(args.input.as_ref())?)?;
    let [lx, ly, ux, uy] = input.bounds;
    let mut voronoi = Voronoi::new(Bounds::new(lx, ly, ux, uy));
    voronoi.set_options(Options {
        duplicates: if args.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Merge
        },
        epsilon: args.epsilon,
    });
    for [x, y] in input.sites {
        voronoi.add_site(x, y);
    }
    let dcel = voronoi.compute()?;
    info!(
        "{} cells, {} vertices, {} half-edges",
        dcel.num_faces(),
        dcel.num_vertices(),
        dcel.num_edges()
    );
    if let Err(msg) = dcel.validate() {
        warn!("diagram failed its self-check: {}", msg);
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&dcel)?),
        Format::Polygons => {
            for (f, face) in dcel.faces().iter().enumerate() {
                let site = dcel.site(face.site);
                let corners: Vec<String> = dcel
                    .face_polygon(f as u32)
                    .iter()
                    .map(|p| format!("({}, {})", p.x, p.y))
                    .collect();
                println!(
                    "site {} ({}, {}): {}",
                    site.input,
                    site.point.x,
                    site.point.y,
                    corners.join(" ")
                );
            }
        }
    }
    Ok(())
}

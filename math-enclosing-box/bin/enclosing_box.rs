use anyhow::{Context, bail};
use clap::Parser;
use math_convex_hull::{ConvexHullBuilder, Point};
use math_enclosing_box::{BoxConfig, MinimalEnclosingBox};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "enclosing-box",
    about = "Convex hull and minimal enclosing parallelepiped of a 3D point cloud"
)]
struct Cli {
    /// Input file with one `x y z` point per line (`#` starts a comment)
    input: PathBuf,

    /// JSON file with a BoxConfig; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Relative tolerance used by the hull predicates
    #[arg(long)]
    epsilon: Option<f64>,

    /// Disable the Akl-Toussaint interior point filter
    #[arg(long, default_value_t = false)]
    no_filter: bool,

    /// Only build the convex hull
    #[arg(long, default_value_t = false)]
    hull_only: bool,

    /// Pretty-print the JSON summary
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Serialize)]
struct HullSummary {
    faces: usize,
    vertices: usize,
    edges: usize,
    volume: f64,
    surface_area: f64,
}

#[derive(Serialize)]
struct BoxSummary {
    volume: f64,
    corners: Vec<[f64; 3]>,
    normals: Vec<[f64; 3]>,
    thicknesses: Vec<f64>,
}

#[derive(Serialize)]
struct Summary {
    points: usize,
    hull: HullSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    enclosing_box: Option<BoxSummary>,
    elapsed_ms: f64,
}

fn parse_points(text: &str) -> anyhow::Result<Vec<Point>> {
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let coords = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}: invalid number", lineno + 1))?;
        if coords.len() != 3 {
            bail!("line {}: expected 3 coordinates, got {}", lineno + 1, coords.len());
        }
        points.push(Point::new(coords[0], coords[1], coords[2]));
    }
    Ok(points)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config: BoxConfig = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => BoxConfig::default(),
    };
    if let Some(epsilon) = cli.epsilon {
        config.hull.epsilon = epsilon;
    }
    if cli.no_filter {
        config.hull.use_akl_toussaint = false;
    }

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading points {}", cli.input.display()))?;
    let points = parse_points(&text)?;
    log::info!("read {} points from {}", points.len(), cli.input.display());

    let start = Instant::now();
    let hull = ConvexHullBuilder::new(config.hull.clone()).build(&points)?;
    let enclosing_box = if cli.hull_only {
        None
    } else {
        Some(MinimalEnclosingBox::new(config).compute_from_hull(&hull)?)
    };
    let elapsed = start.elapsed();

    let summary = Summary {
        points: points.len(),
        hull: HullSummary {
            faces: hull.num_faces(),
            vertices: hull.num_vertices(),
            edges: hull.num_edges(),
            volume: hull.volume(),
            surface_area: hull.surface_area(),
        },
        enclosing_box: enclosing_box.map(|b| BoxSummary {
            volume: b.volume(),
            corners: b.corners().iter().map(Point::to_array).collect(),
            normals: b.planes().iter().map(|p| p.normal.to_array()).collect(),
            thicknesses: b.planes().iter().map(|p| p.thickness).collect(),
        }),
        elapsed_ms: elapsed.as_secs_f64() * 1e3,
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", json);
    Ok(())
}

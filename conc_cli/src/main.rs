//! # Conctools CLI
//!
//! Computes the N–M capacity diagram of every section in a project file and
//! prints it as a table. Without a project file a textbook rectangular
//! column is used.
//!
//! ```text
//! conc_cli [PROJECT.json] [--out DIAGRAMS.json] [--locations N]
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::path::PathBuf;

use conc_core::calculations::{capacity_diagram, CapacityDiagram};
use conc_core::errors::{CalcError, CalcResult};
use conc_core::file_io::{load_project, save_diagram};
use conc_core::materials::{ConcreteGrade, ConcreteMaterial, ReinforcingSteel};
use conc_core::project::Project;
use conc_core::section::{Rebar, Section, SectionInput};
use conc_core::sectiongen;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: conc_cli [PROJECT.json] [--out DIAGRAMS.json] [--locations N]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    project: Option<PathBuf>,
    out: Option<PathBuf>,
    locations: Option<usize>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-o" | "--out" => {
                let path = args.next().ok_or("--out needs a file path")?;
                parsed.out = Some(PathBuf::from(path));
            }
            "-n" | "--locations" => {
                let value = args.next().ok_or("--locations needs a number")?;
                let n = value
                    .parse()
                    .map_err(|_| format!("--locations expects a positive integer, got '{value}'"))?;
                parsed.locations = Some(n);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{flag}'")),
            path => {
                if parsed.project.is_some() {
                    return Err(format!("Unexpected argument '{path}'"));
                }
                parsed.project = Some(PathBuf::from(path));
            }
        }
    }
    Ok(parsed)
}

/// Textbook column: 350x450, C25/30, B500, 2ø25 bottom and 2ø32 top
fn demo_project() -> CalcResult<Project> {
    let mut project = Project::new("", "DEMO", "");
    let section = Section::new(SectionInput {
        label: "Demo column 350x450".to_string(),
        vertices: sectiongen::rectangle(350.0, 450.0)?,
        rebars: vec![
            Rebar::new(60.0, 60.0, 25.0),
            Rebar::new(290.0, 60.0, 25.0),
            Rebar::new(60.0, 390.0, 32.0),
            Rebar::new(290.0, 390.0, 32.0),
        ],
        concrete: ConcreteMaterial::from_grade(ConcreteGrade::C25).with_alpha_cc(0.85),
        steel: ReinforcingSteel::new(500.0),
        cover_mm: 45.0,
    })?;
    project.add_section(section);
    Ok(project)
}

fn run(args: &Args) -> CalcResult<()> {
    let mut project = match &args.project {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading project");
            load_project(path)?
        }
        None => {
            tracing::info!("no project given, running demo section");
            demo_project()?
        }
    };
    if let Some(n) = args.locations {
        project.settings.n_locations = n;
    }

    let mut diagrams = Vec::with_capacity(project.section_count());
    for (id, section) in project.sorted_sections() {
        for violation in section.cover_violations() {
            tracing::warn!(
                section = section.label(),
                rebar = violation.index,
                clear_cover_mm = violation.clear_cover_mm,
                required_mm = violation.required_mm,
                inside = violation.inside,
                "insufficient rebar cover"
            );
        }

        let diagram = capacity_diagram(section, &project.settings).map_err(|e| {
            tracing::error!(section = section.label(), %id, error = %e, "diagram failed");
            e
        })?;
        print_section(section);
        print_diagram(&diagram);
        diagrams.push(diagram);
    }

    if let Some(out) = &args.out {
        save_diagram(&diagrams, out)?;
        tracing::info!(path = %out.display(), diagrams = diagrams.len(), "diagrams written");
    }
    Ok(())
}

fn print_section(section: &Section) {
    let pc = section.plastic_centroid();
    println!("═══════════════════════════════════════════════════════");
    println!("  {}", if section.label().is_empty() { "(unnamed section)" } else { section.label() });
    println!("═══════════════════════════════════════════════════════");
    println!("  Concrete area:     {:>10.0} mm²", section.area());
    println!("  Steel area:        {:>10.0} mm² ({:.2} %)", section.steel_area(), 100.0 * section.reinforcement_ratio());
    println!("  Plastic centroid:  ({:.0}, {:.0}) mm", pc.x, pc.y);
    println!(
        "  Materials:         fcd = {:.2} MPa, alpha_cc = {:.2}, fyd = {:.1} MPa",
        section.concrete().fcd().0,
        section.concrete().alpha_cc,
        section.steel().fyd().0
    );
    println!();
}

fn print_diagram(diagram: &CapacityDiagram) {
    println!("  {:<6} {:>12} {:<17} {:>10} {:>10}", "side", "y_na [mm]", "state", "N [kN]", "M [kNm]");
    println!("  {}", "-".repeat(59));
    for point in &diagram.points {
        println!(
            "  {:<6} {:>12.1} {:<17} {:>10.0} {:>10.0}",
            point.compression_side.to_string(),
            point.neutral_axis.y_intercept,
            point.state.to_string(),
            point.normal_force_kn,
            point.moment_knm
        );
    }
    println!();
    if let (Some(c), Some(t)) = (diagram.max_compression(), diagram.max_tension()) {
        println!("  Max compression: N = {:.0} kN", c.normal_force_kn);
        println!("  Max tension:     N = {:.0} kN", t.normal_force_kn);
    }
    if let (Some(hi), Some(lo)) = (diagram.max_moment(), diagram.min_moment()) {
        println!("  Moment range:    {:.0} .. {:.0} kNm", lo.moment_knm, hi.moment_knm);
    }
    println!();
}

fn report(error: &CalcError) {
    eprintln!("Error: {}", error);
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conc_cli=info,conc_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    if args.help {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = run(&args) {
        report(&e);
        std::process::exit(1);
    }
}

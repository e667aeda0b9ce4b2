use crate::config::{Config, load_config};
use crate::ir::FamilyGraph;
use crate::layout::{FamilyLayout, LayoutError, compute_grid_layout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_family_graph;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Family tree layout and renderer")]
pub struct Args {
    /// Input file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Fall back to a plain generation grid when the graph has a parent/child cycle
    #[arg(long = "fallback-grid")]
    pub fallback_grid: bool,

    /// Log filter, e.g. "debug" or "family_tree_renderer=trace". RUST_LOG wins when set.
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

/// Installs a stderr fmt subscriber so SVG and JSON on stdout stay clean.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("Invalid log level '{level}': {e}"))?,
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let graph = parse_family_graph(&input)?;
    info!(
        persons = graph.persons.len(),
        relationships = graph.relationships.len(),
        "cli.input.parsed"
    );
    let layout = layout_graph(&graph, &config, args.fallback_grid)?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &layout, &config.layout)?;
        }
    }
    Ok(())
}

fn layout_graph(graph: &FamilyGraph, config: &Config, fallback_grid: bool) -> Result<FamilyLayout> {
    match compute_layout(graph, &config.layout) {
        Ok(layout) => Ok(layout),
        Err(LayoutError::Cycle { path }) if fallback_grid => {
            warn!(cycle = %path.join(" -> "), "cli.layout.grid_fallback");
            Ok(compute_grid_layout(graph, &config.layout))
        }
        Err(err) => Err(err.into()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Person;

    fn cyclic() -> FamilyGraph {
        let mut graph = FamilyGraph::new();
        graph.add_person(Person::new("a"));
        graph.add_person(Person::new("b"));
        graph.add_parent("a", "b");
        graph.add_parent("b", "a");
        graph
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "ftree",
            "-i",
            "tree.json",
            "-e",
            "json",
            "--fallback-grid",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.fallback_grid);
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.width, 1200.0);
    }

    #[test]
    fn cycle_is_an_error_without_fallback() {
        let err = layout_graph(&cyclic(), &Config::default(), false).unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn cycle_uses_grid_with_fallback() {
        let layout = layout_graph(&cyclic(), &Config::default(), true).unwrap();
        assert_eq!(layout.nodes.len(), 2);
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}

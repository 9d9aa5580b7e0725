use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::annotate::annotate_svg;
use crate::catalogue::snapshot::snapshot_to_string;
use crate::catalogue::{load_catalogue, Target};
use crate::config::resolve::load_settings;
use crate::config::{CatalogueSettings, GroupSource, Settings};
use crate::core::{Catalogue, Group};
use crate::error::{DepvizError, Result};
use crate::graph::builder::build_graph;
use crate::graph::ops::{dangling_references, graph_to_json, reachable_from};
use crate::graph::viz::render_dot;
use crate::layout::{GraphvizPipeline, LayoutEngine};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "depviz")]
#[command(about = "Package dependency graphs with collapsible groups", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph of a system
    Graph(GraphArgs),
    /// Save the package catalogue of a system as JSON
    Catalogue(CatalogueArgs),
    /// Print shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Directory, container image or snapshot (.json) to inspect
    pub target: String,
    /// Label nodes with their installed size
    #[arg(long)]
    pub sizes: bool,
    /// Collapse the packages of another target into one node, as NAME=TARGET
    #[arg(short = 'g', long = "group")]
    pub groups: Vec<String>,
    /// Only keep what this package transitively depends on
    #[arg(long)]
    pub root: Option<String>,
    #[arg(short = 'f', long, default_value = "dot")]
    pub format: String,
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    #[arg(short = 'y', long)]
    pub yes: bool,
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CatalogueArgs {
    pub target: String,
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    #[arg(short = 'y', long)]
    pub yes: bool,
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    output::configure(cli.verbose, cli.quiet, cli.no_color);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Graph(args) => handle_graph(args, cli.config),
        Commands::Catalogue(args) => handle_catalogue(args, cli.config),
        Commands::Completions(args) => handle_completions(args),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Dot,
    Json,
    Svg,
}

fn parse_output_format(input: &str) -> Result<OutputFormat> {
    match input.to_ascii_lowercase().as_str() {
        "dot" => Ok(OutputFormat::Dot),
        "json" => Ok(OutputFormat::Json),
        "svg" => Ok(OutputFormat::Svg),
        _ => Err(DepvizError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            input
        )))),
    }
}

fn handle_graph(args: GraphArgs, config_path: Option<PathBuf>) -> Result<()> {
    let format = parse_output_format(&args.format)?;
    let settings = load_settings(env::current_dir()?, config_path)?;
    let target = Target::parse(&args.target)?;

    let catalogue = load_with_progress(&target, &settings.catalogue, args.jobs)?;
    output::info(&format!(
        "loaded {} packages from {}",
        catalogue.len(),
        target
    ));

    let groups = collect_groups(&args.groups, &settings, &catalogue, args.jobs)?;
    let mut graph = build_graph(&catalogue, &groups)?;
    if let Some(root) = args.root.as_deref() {
        graph = reachable_from(&graph, root)?;
    }
    output::debug(&format!(
        "graph has {} nodes ({} groups)",
        graph.len(),
        groups.len()
    ));
    for edge in dangling_references(&graph) {
        output::warn(&format!(
            "dependency '{}' of '{}' is not in the graph",
            edge.to, edge.from
        ));
    }

    let rendered = match format {
        OutputFormat::Dot => render_dot(&graph, args.sizes)?,
        OutputFormat::Json => serde_json::to_string_pretty(&graph_to_json(&graph))?,
        OutputFormat::Svg => {
            let dot = render_dot(&graph, args.sizes)?;
            let pipeline = GraphvizPipeline::from_settings(&settings.layout);
            let spinner = output::spinner("laying out graph");
            let svg = pipeline.render(&dot);
            spinner.finish_and_clear();
            annotate_svg(&svg?)?
        }
    };

    write_output(args.output.as_deref(), &rendered, args.yes)
}

fn handle_catalogue(args: CatalogueArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(env::current_dir()?, config_path)?;
    let target = Target::parse(&args.target)?;
    let catalogue = load_with_progress(&target, &settings.catalogue, args.jobs)?;
    output::info(&format!(
        "loaded {} packages from {}",
        catalogue.len(),
        target
    ));
    write_output(
        args.output.as_deref(),
        &snapshot_to_string(&catalogue)?,
        args.yes,
    )
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "depviz", &mut io::stdout());
    Ok(())
}

fn load_with_progress(
    target: &Target,
    settings: &CatalogueSettings,
    jobs: Option<usize>,
) -> Result<Catalogue> {
    let spinner = output::spinner(&format!("reading packages of {target}"));
    let catalogue = load_catalogue(target, settings, jobs);
    spinner.finish_and_clear();
    catalogue
}

/// Groups from the config file, then `--group` flags; a flag replaces a
/// configured group of the same name.
fn collect_groups(
    specs: &[String],
    settings: &Settings,
    catalogue: &Catalogue,
    jobs: Option<usize>,
) -> Result<Vec<Group>> {
    let mut flagged: BTreeMap<String, Target> = BTreeMap::new();
    for spec in specs {
        let (name, target) = parse_group_spec(spec)?;
        flagged.insert(name, target);
    }

    let mut groups = Vec::new();
    for (name, entry) in &settings.groups {
        if flagged.contains_key(name) {
            output::debug(&format!("group '{name}' from --group replaces configured group"));
            continue;
        }
        let group = match entry.source(name)? {
            GroupSource::Target(spec) => {
                let target = Target::parse(&spec)?;
                let members = load_with_progress(&target, &settings.catalogue, jobs)?;
                Group::aggregate(name.clone(), &members)
            }
            GroupSource::Packages(names) => Group::from_names(name.clone(), names, catalogue),
            GroupSource::Pattern(pattern) => Group::matching(name.clone(), &pattern, catalogue),
        };
        groups.push(log_group(group));
    }

    for (name, target) in flagged {
        let members = load_with_progress(&target, &settings.catalogue, jobs)?;
        groups.push(log_group(Group::aggregate(name, &members)));
    }

    Ok(groups)
}

fn log_group(group: Group) -> Group {
    output::info(&format!(
        "group '{}': {} packages",
        group.name,
        group.packages.len()
    ));
    group
}

fn parse_group_spec(spec: &str) -> Result<(String, Target)> {
    let (name, target) = spec
        .split_once('=')
        .ok_or_else(|| DepvizError::InvalidGroupSpec(spec.to_string()))?;
    let name = name.trim();
    if name.is_empty() || target.trim().is_empty() {
        return Err(DepvizError::InvalidGroupSpec(spec.to_string()));
    }
    Ok((name.to_string(), Target::parse(target)?))
}

fn write_output(path: Option<&Path>, content: &str, assume_yes: bool) -> Result<()> {
    let Some(path) = path else {
        println!("{content}");
        return Ok(());
    };

    if path.exists() {
        let confirm = output::confirm(
            &format!("Overwrite {}?", path.display()),
            assume_yes,
        )
        .map_err(|err| DepvizError::Other(anyhow::Error::new(err)))?;
        if !confirm {
            return Err(DepvizError::Other(anyhow::anyhow!(format!(
                "refusing to overwrite {}",
                path.display()
            ))));
        }
    }

    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    output::info(&format!("wrote {}", path.display()));
    Ok(())
}

use focal::{EngineConfig, FocalEngine, FocalSelection, SelectionMode};
use focal_graphlib::{Graph, NodeId, RawGraph};
use focal_layout::{Algorithm, LayoutState};
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Engine(focal::Error),
    Layout(focal_layout::Error),
    EdgeOutOfRange {
        source: NodeId,
        target: NodeId,
        num_nodes: usize,
    },
    NoResult,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Engine(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::EdgeOutOfRange {
                source,
                target,
                num_nodes,
            } => write!(
                f,
                "edge ({source}, {target}) has an endpoint outside [0, {num_nodes})"
            ),
            CliError::NoResult => write!(f, "layout finished without a result"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<focal::Error> for CliError {
    fn from(value: focal::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<focal_layout::Error> for CliError {
    fn from(value: focal_layout::Error) -> Self {
        Self::Layout(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Resolve,
    Initial,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    layout: Option<Algorithm>,
    hops: Option<usize>,
    groups: Vec<Vec<NodeId>>,
    pair: Option<(NodeId, NodeId)>,
    local_mask: bool,
    no_bundle: bool,
    bounded: bool,
    seed: Option<u64>,
}

fn usage() -> &'static str {
    "focal-cli\n\
\n\
USAGE:\n\
  focal-cli [layout] [--config <path>] [--layout <name>] [--hops <n>] [--groups <g>] [--pair <a>,<b>] [--local] [--no-bundle] [--seed <n>] [--pretty] [<graph.json>|-]\n\
  focal-cli resolve [--config <path>] [--hops <n>] [--groups <g>] [--pretty] [<graph.json>|-]\n\
  focal-cli initial [--config <path>] [--bounded] [--seed <n>] [--pretty] [<graph.json>|-]\n\
\n\
NOTES:\n\
  - The graph is JSON: {\"numNodes\": n, \"edges\": [{\"source\": a, \"target\": b}, ...]}.\n\
  - If <graph.json> is omitted or '-', the graph is read from stdin.\n\
  - <g> lists groups separated by ';' and node ids separated by ',', e.g. \"0,1;7\".\n\
  - --layout accepts embedding-projection, constraint, force-directed, space-filling\n\
    (or the aliases umap, cola, d3, spiral).\n\
  - Set RUST_LOG (default warn) for diagnostics on stderr.\n\
"
}

fn parse_node_list(raw: &str) -> Option<Vec<NodeId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<NodeId>().ok())
        .collect()
}

fn parse_groups(raw: &str) -> Option<Vec<Vec<NodeId>>> {
    raw.split(';')
        .map(parse_node_list)
        .filter(|g| g.as_ref().is_none_or(|g| !g.is_empty()))
        .collect()
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        let mut value = || it.next().ok_or(CliError::Usage(usage()));
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "resolve" => args.command = Command::Resolve,
            "initial" => args.command = Command::Initial,
            "--pretty" => args.pretty = true,
            "--local" => args.local_mask = true,
            "--no-bundle" => args.no_bundle = true,
            "--bounded" => args.bounded = true,
            "--config" => args.config = Some(value()?.clone()),
            "--layout" => {
                let name = value()?;
                args.layout = Some(Algorithm::from_name(name).ok_or(CliError::Usage(usage()))?);
            }
            "--hops" => {
                args.hops = Some(value()?.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--seed" => {
                args.seed = Some(value()?.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--groups" => {
                args.groups = parse_groups(value()?).ok_or(CliError::Usage(usage()))?;
            }
            "--pair" => {
                let nodes = parse_node_list(value()?).ok_or(CliError::Usage(usage()))?;
                let [a, b] = nodes[..] else {
                    return Err(CliError::Usage(usage()));
                };
                args.pair = Some((a, b));
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

/// Parses the graph, rejecting out-of-range endpoints instead of panicking in the loader.
fn load_graph(text: &str) -> Result<Arc<Graph>, CliError> {
    let raw: RawGraph = serde_json::from_str(text)?;
    let num_nodes = raw.num_nodes;
    if let Some(e) = raw
        .edges
        .iter()
        .find(|e| e.source >= num_nodes || e.target >= num_nodes)
    {
        return Err(CliError::EdgeOutOfRange {
            source: e.source,
            target: e.target,
            num_nodes,
        });
    }
    Ok(Arc::new(raw.into_graph()))
}

fn load_config(args: &Args) -> Result<EngineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(hops) = args.hops {
        config.hops = hops;
    }
    if let Some(layout) = &args.layout {
        config.focal_graph.algorithm = layout.clone();
    }
    if args.local_mask {
        config.focal_graph.use_global_mask = false;
    }
    if args.no_bundle {
        config.focal_graph.use_edge_bundling = false;
    }
    if args.bounded {
        config.initial.bounded = true;
    }
    if let Some(seed) = args.seed {
        config.initial.random_seed = seed;
        config.focal_graph.algorithm = with_seed(&config.focal_graph.algorithm, seed);
    }
    Ok(config)
}

fn with_seed(algorithm: &Algorithm, seed: u64) -> Algorithm {
    match algorithm {
        Algorithm::EmbeddingProjection(o) => {
            Algorithm::EmbeddingProjection(focal_layout::ProjectionOptions { random_seed: seed, ..*o })
        }
        Algorithm::Constraint(o) => {
            Algorithm::Constraint(focal_layout::ConstraintOptions { random_seed: seed, ..*o })
        }
        Algorithm::ForceDirected(o) => {
            Algorithm::ForceDirected(focal_layout::ForceOptions { random_seed: seed, ..*o })
        }
        Algorithm::SpaceFilling(o) => Algorithm::SpaceFilling(*o),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let graph = load_graph(&read_input(args.input.as_deref())?)?;
    let config = load_config(&args)?;
    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.edge_count(),
        hops = config.hops,
        "graph loaded"
    );

    match args.command {
        Command::Resolve => {
            let state = LayoutState::initialize(graph, config.hops, config.metric, config.spec);
            let mut selection = FocalSelection::new();
            for g in &args.groups {
                selection.apply(SelectionMode::Create, g);
            }
            let resolution =
                focal_layout::resolve(selection.groups(), &state.masks, state.hops())?;
            write_json(&resolution, args.pretty)
        }
        Command::Initial => {
            let engine = FocalEngine::new(config)?;
            block_on(async {
                engine.initialize(graph).await?;
                engine.initial_layout().await
            })?;
            let initial = engine.initial().ok_or(CliError::NoResult)?;
            write_json(initial.as_ref(), args.pretty)
        }
        Command::Layout => {
            let engine = FocalEngine::new(config)?;
            block_on(async {
                engine.initialize(graph).await?;
                match args.pair {
                    Some((a, b)) => engine.select_pair(a, b).await,
                    None => engine.select_groups(&args.groups).await,
                }
            })?;
            let layout = engine.current_layout().ok_or(CliError::NoResult)?;
            write_json(layout.as_ref(), args.pretty)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("focal-cli")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn groups_parse_from_semicolon_lists() {
        assert_eq!(parse_groups("0,1;7"), Some(vec![vec![0, 1], vec![7]]));
        assert_eq!(parse_groups("3; ;4,"), Some(vec![vec![3], vec![4]]));
        assert_eq!(parse_groups("a"), None);
    }

    #[test]
    fn layout_flags_are_parsed() {
        let args = parse_args(&argv(&["layout", "--layout", "spiral", "--pair", "2,5", "g.json"])).unwrap();
        assert!(matches!(args.command, Command::Layout));
        assert!(matches!(args.layout, Some(Algorithm::SpaceFilling(_))));
        assert_eq!(args.pair, Some((2, 5)));
        assert_eq!(args.input.as_deref(), Some("g.json"));
    }

    #[test]
    fn bad_arguments_are_usage_errors() {
        for bad in [&["--layout", "grid"][..], &["--pair", "1"], &["--hops"], &["--bogus"], &["a", "b"]] {
            assert!(matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))), "{bad:?}");
        }
    }

    #[test]
    fn stdin_dash_is_an_input() {
        let args = parse_args(&argv(&["resolve", "-"])).unwrap();
        assert_eq!(args.input.as_deref(), Some("-"));
    }
}

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use drug_indices::visualization::{to_dot, write_dot};
use drug_indices::{
    compute_from_edges, BatchConfig, BatchResults, CompoundSource, EdgeRelations, IndexTable,
    Pipeline, PubChemClient, PurrParser, StaticSource,
};

use crate::cli::{Command, ComputeArgs, DrawArgs, FetchArgs, RunArgs, SourceOptions, TableOptions};
use crate::display::print_batch_summary;

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run(args),
        Command::Fetch(args) => fetch(args),
        Command::Compute(args) => compute(args),
        Command::Draw(args) => draw(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.source.config.as_deref())?;
    apply_source_options(&mut config, &args.source);
    apply_table_options(&mut config, &args.table);
    if let Some(edges) = args.edges {
        config.edges_path = edges;
    }
    config.validate()?;

    let batch = retrieve(&config, args.source.smiles_file.as_deref())?;
    write_edges(&batch, &config.edges_path)?;
    write_table(&batch, &config)?;
    Ok(())
}

fn fetch(args: FetchArgs) -> Result<()> {
    let mut config = load_config(args.source.config.as_deref())?;
    apply_source_options(&mut config, &args.source);
    if let Some(edges) = args.edges {
        config.edges_path = edges;
    }
    config.validate()?;

    let batch = retrieve(&config, args.source.smiles_file.as_deref())?;
    write_edges(&batch, &config.edges_path)
}

fn compute(args: ComputeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_table_options(&mut config, &args.table);
    config.validate()?;

    let relations = EdgeRelations::load(&args.edges)
        .with_context(|| format!("Failed to load edge relations from {}", args.edges.display()))?;
    let batch = compute_from_edges(&relations).finish()?;
    print_batch_summary(&batch);
    write_table(&batch, &config)
}

fn draw(args: DrawArgs) -> Result<()> {
    let mut config = BatchConfig::default();
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }

    let source = build_source(&config, args.smiles_file.as_deref())?;
    let graph = Pipeline::new(source, PurrParser)
        .graph(&args.name)
        .with_context(|| format!("Cannot build the molecular graph of '{}'", args.name))?;

    match args.output {
        Some(path) => {
            write_dot(&graph, &args.name, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "graph written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(to_dot(&graph, &args.name).as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<BatchConfig> {
    match path {
        Some(path) => Ok(BatchConfig::load(path)?),
        None => Ok(BatchConfig::default()),
    }
}

fn apply_source_options(config: &mut BatchConfig, opts: &SourceOptions) {
    if !opts.compounds.is_empty() {
        config.compounds = opts.compounds.clone();
    }
    if let Some(url) = &opts.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = opts.timeout {
        config.timeout_secs = secs;
    }
    if opts.sort {
        config.sort = true;
    }
}

fn apply_table_options(config: &mut BatchConfig, opts: &TableOptions) {
    if let Some(table) = &opts.table {
        config.table_path = table.clone();
    }
    if let Some(decimals) = opts.decimals {
        config.decimals = decimals;
    }
}

fn build_source(config: &BatchConfig, smiles_file: Option<&Path>) -> Result<Box<dyn CompoundSource>> {
    match smiles_file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open SMILES file {}", path.display()))?;
            let source = StaticSource::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to read SMILES file {}", path.display()))?;
            info!(entries = source.len(), "using offline SMILES table");
            Ok(Box::new(source))
        }
        None => {
            let client = PubChemClient::new(config.base_url.clone(), config.timeout()?)
                .context("Failed to set up the HTTP client")?;
            Ok(Box::new(client))
        }
    }
}

fn retrieve(config: &BatchConfig, smiles_file: Option<&Path>) -> Result<BatchResults> {
    let source = build_source(config, smiles_file)?;
    let names = config.ordered_compounds();
    info!(compounds = names.len(), "starting batch");

    let batch = Pipeline::new(source, PurrParser).run(&names).finish()?;
    print_batch_summary(&batch);
    Ok(batch)
}

fn write_edges(batch: &BatchResults, path: &Path) -> Result<()> {
    EdgeRelations::from_batch(batch)
        .save(path)
        .with_context(|| format!("Failed to write edge relations to {}", path.display()))?;
    info!(path = %path.display(), "edge relations saved");
    Ok(())
}

fn write_table(batch: &BatchResults, config: &BatchConfig) -> Result<()> {
    let path = &config.table_path;
    IndexTable::from_batch(batch, config.decimals()?)
        .save(path)
        .with_context(|| format!("Failed to write index table to {}", path.display()))?;
    info!(path = %path.display(), "drug indices saved");
    Ok(())
}

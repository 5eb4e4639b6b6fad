//! Command-line driver.
//!
//! Usage:
//!   softnet train --spec run.json --dataset data.json --output model.txt
//!   softnet predict --model model.txt --input 0,0,0,0,0,0,0,0,1,1,1,1,1,1,1,1

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use softnet::activation::range_normalize;
use softnet::{train, Dataset, Network, NetworkSpec, Topology, TrainConfig};

#[derive(Parser)]
#[command(name = "softnet")]
#[command(about = "Train and run small dense networks with a bounded softsign activation")]
struct Args {
    /// Log per-batch updates and worker launches
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a network and save it
    Train {
        /// JSON run description (name, layers, training); defaults to the built-in pattern run
        #[arg(short, long)]
        spec: Option<String>,

        /// JSON dataset ({"inputs": [...], "targets": [...]}); defaults to the built-in patterns
        #[arg(short, long)]
        dataset: Option<String>,

        /// Model output path; `.json` writes JSON, anything else the text format
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a saved model on one input
    Predict {
        /// Model file written by `train`
        #[arg(short, long)]
        model: String,

        /// Comma-separated input values
        #[arg(short, long)]
        input: String,

        /// Also print the output rescaled into [0, 1]
        #[arg(short, long)]
        range: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Train { spec, dataset, output } => run_train(spec, dataset, output),
        Command::Predict { model, input, range } => run_predict(&model, &input, range),
    }
}

fn run_train(spec: Option<String>, dataset: Option<String>, output: Option<String>) -> Result<()> {
    let spec = match spec {
        Some(path) => NetworkSpec::load_json(&path).with_context(|| format!("loading spec {path}"))?,
        None => default_spec()?,
    };
    let data = match dataset {
        Some(path) => Dataset::load_json(&path).with_context(|| format!("loading dataset {path}"))?,
        None => pattern_dataset()?,
    };

    let sizes = spec.layers.sizes().to_vec();
    let mut network = match spec.training.seed {
        Some(seed) => Network::with_seed(sizes, seed)?,
        None => Network::new(sizes)?,
    };

    let summary = train(&mut network, &data, &spec.training)?;

    let path = output.unwrap_or_else(|| format!("{}.txt", spec.name));
    network
        .save(&path)
        .with_context(|| format!("saving model to {path}"))?;
    info!(
        path = %path,
        final_error = summary.final_error().unwrap_or_default(),
        "model saved"
    );
    Ok(())
}

fn run_predict(model: &str, input: &str, range: bool) -> Result<()> {
    let network = Network::load(model).with_context(|| format!("loading model {model}"))?;
    let values = input
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("parsing --input")?;
    if values.len() != network.topology.input_size() {
        bail!(
            "model expects {} inputs, got {}",
            network.topology.input_size(),
            values.len()
        );
    }

    let mut output = network.forward(&values)?;
    println!("output: {output:?}");
    if range {
        range_normalize(&mut output);
        println!("range-normalized: {output:?}");
    }
    Ok(())
}

fn default_spec() -> Result<NetworkSpec> {
    Ok(NetworkSpec {
        name: "patterns".to_owned(),
        layers: Topology::new(vec![16, 8, 6, 4])?,
        training: TrainConfig::default(),
    })
}

/// Eight 16-wide patterns, each labelled with one of four classes.
fn pattern_dataset() -> Result<Dataset> {
    let zeros = [0.0; 8];
    let ones = [1.0; 8];
    let neg = [-1.0; 8];
    let alt = [0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5];
    let gaps = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0];

    let cat = |a: &[f64; 8], b: &[f64; 8]| -> Vec<f64> { a.iter().chain(b).copied().collect() };
    let inputs = vec![
        cat(&zeros, &ones),
        cat(&zeros, &neg),
        cat(&alt, &ones),
        cat(&alt, &alt),
        cat(&gaps, &ones),
        cat(&alt, &neg),
        cat(&zeros, &alt),
        cat(&zeros, &alt),
    ];
    let class = |c: usize| -> Vec<f64> { (0..4).map(|i| if i == c { 1.0 } else { 0.0 }).collect() };
    let targets = vec![class(0), class(3), class(0), class(1), class(2), class(1), class(0), class(0)];

    Ok(Dataset::new(inputs, targets)?)
}

// Command-line front end: builds a network from a JSON description and, given an IDX
// image/label pair, previews a few images and scores the network on them.
//
//   swan <network.json> [<images-idx3> <labels-idx1> [count]]
use std::process::ExitCode;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swan::data::{self, Dataset};
use swan::{Network, NetworkSpec, Result};

const DEFAULT_PREVIEW: usize = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() == 2 || args.len() > 4 {
        eprintln!("usage: swan <network.json> [<images-idx3> <labels-idx1> [count]]");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let spec = NetworkSpec::load_json(&args[0])?;
    let mut network = Network::from_spec(&spec)?;

    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    network.randomize(&mut rng);

    info!(
        name = %spec.name,
        inputs = network.input_neurons(),
        layers = network.len(),
        "network ready"
    );
    for (i, layer) in network.layers().iter().enumerate() {
        println!(
            "layer {}: {} -> {} ({:?})",
            i,
            layer.input_size(),
            layer.size(),
            layer.activation()
        );
    }

    if args.len() >= 3 {
        let count = match args.get(3) {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                swan::SwanError::InvalidConfiguration(format!("invalid preview count '{}'", raw))
            })?,
            None => DEFAULT_PREVIEW,
        };
        preview(&network, &spec, &args[1], &args[2], count)?;
    }

    network.unload();
    Ok(())
}

fn preview(
    network: &Network,
    spec: &NetworkSpec,
    images_path: &str,
    labels_path: &str,
    count: usize,
) -> Result<()> {
    let dataset = Dataset::load(images_path, labels_path)?;
    info!(items = dataset.len(), "dataset loaded");

    let classes = network.output_neurons().unwrap_or(0);
    let images = &dataset.images;

    for (i, &label) in dataset.labels.iter().take(count).enumerate() {
        let Some(pixels) = images.image(i) else { break };

        println!("should be: {}", label);
        print!("{}", data::render_ascii(pixels, images.rows, images.cols)?);

        let input = data::image_to_input(pixels);
        let output = network.forward(&input)?;
        println!("output: {:?}", output.as_slice());

        let target = data::one_hot(label, classes)?;
        let loss = spec.loss.evaluate(output.as_slice(), &target)?;
        println!("{:?} loss: {:.6}", spec.loss, loss);
    }

    Ok(())
}

use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, SwanError};
use crate::layers::dense::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;

/// An ordered stack of dense layers with a fixed input width.
///
/// Layers are appended one at a time and never removed; insertion order is
/// feed-forward order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    input_neurons: usize,
    layers: Vec<Layer>,
}

impl Network {
    /// Creates an empty network accepting `input_neurons` values per example.
    pub fn new(input_neurons: usize) -> Result<Network> {
        if input_neurons == 0 {
            warn!("rejected network with zero input neurons");
            return Err(SwanError::InvalidConfiguration(
                "a network needs at least one input neuron".to_owned(),
            ));
        }
        Ok(Network { input_neurons, layers: Vec::new() })
    }

    /// Builds and validates a network from its JSON-level description.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        let mut network = Network::new(spec.input_neurons)?;
        for layer in &spec.layers {
            network.add_layer(layer.neurons, layer.activation)?;
        }
        Ok(network)
    }

    pub fn input_neurons(&self) -> usize {
        self.input_neurons
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Width of the final layer, or `None` while the network has no layers.
    pub fn output_neurons(&self) -> Option<usize> {
        self.layers.last().map(Layer::size)
    }

    /// Appends a zero-filled layer of `neurons` neurons.
    ///
    /// Its fan-in is the previous layer's width, or `input_neurons` for the
    /// first layer. A zero-sized layer is rejected and the network is left
    /// untouched.
    pub fn add_layer(&mut self, neurons: usize, activation: ActivationFunction) -> Result<()> {
        if neurons == 0 {
            warn!(layer = self.layers.len(), "rejected layer with zero neurons");
            return Err(SwanError::InvalidConfiguration(
                "a layer needs at least one neuron".to_owned(),
            ));
        }

        let previous_width = self.output_neurons().unwrap_or(self.input_neurons);
        self.layers.push(Layer::new(neurons, previous_width, activation));
        debug!(
            layer = self.layers.len() - 1,
            inputs = previous_width,
            neurons,
            ?activation,
            "added layer"
        );
        Ok(())
    }

    /// Overwrites every weight and bias with a uniform draw from `[-1, 1]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for layer in &mut self.layers {
            layer.randomize(rng);
        }
        debug!(layers = self.layers.len(), "randomized network parameters");
    }

    /// Runs a forward pass and writes the result into `dest`.
    ///
    /// `input` is `batch x input_neurons`; `dest` must be pre-sized to
    /// `batch x output_neurons`. On error `dest` is left unchanged.
    pub fn execute(&self, input: &Matrix, dest: &mut Matrix) -> Result<()> {
        let last = self.layers.last().ok_or(SwanError::EmptyNetwork)?;

        let expected = (input.rows(), last.size());
        if dest.shape() != expected {
            return Err(SwanError::ShapeMismatch {
                expected,
                found: dest.shape(),
            });
        }

        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feed_from(&current)?;
        }

        dest.copy_from(&current)
    }

    /// Forward pass that allocates its own destination.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let out_cols = self.output_neurons().ok_or(SwanError::EmptyNetwork)?;
        let mut dest = Matrix::zeros(input.rows(), out_cols);
        self.execute(input, &mut dest)?;
        Ok(dest)
    }

    /// Scores the network's prediction for one example against `target`.
    ///
    /// This only evaluates; no parameter is changed.
    pub fn calculate_loss(&self, loss: LossType, input: &[f32], target: &[f32]) -> Result<f32> {
        let output = self.forward(&Matrix::row_vector(input.to_vec()))?;
        loss.evaluate(output.as_slice(), target)
    }

    /// Releases every layer. Consuming `self` makes later use a compile error.
    pub fn unload(self) {
        debug!(layers = self.layers.len(), "unloading network");
    }

    /// Serializes the network parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network written by `save_json` and re-checks its shapes.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        debug!(path, layers = network.layers.len(), "loaded network");
        Ok(network)
    }

    fn validate(&self) -> Result<()> {
        if self.input_neurons == 0 {
            return Err(SwanError::InvalidConfiguration(
                "a network needs at least one input neuron".to_owned(),
            ));
        }
        let mut width = self.input_neurons;
        for layer in &self.layers {
            layer.validate(width)?;
            width = layer.size();
        }
        Ok(())
    }
}

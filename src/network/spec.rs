use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::loss_type::LossType;

/// Describes one layer in a network specification.
///
/// The layer's fan-in is not stored: it is always the previous layer's
/// `neurons`, or the network's `input_neurons` for the first layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub neurons: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture, the loss used to
/// score it and an optional seed for parameter randomization.
///
/// `NetworkSpec` holds no weights; turn it into a network with
/// `Network::from_spec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub input_neurons: usize,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub loss: LossType,
    /// When set, randomization is reproducible across runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_and_seed_are_optional() {
        let json = r#"{
            "name": "digits",
            "input_neurons": 784,
            "layers": [
                {"neurons": 16, "activation": "ReLU"},
                {"neurons": 10, "activation": "Sigmoid"}
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.loss, LossType::MeanSquaredError);
        assert_eq!(spec.seed, None);
        assert_eq!(spec.layers[1].activation, ActivationFunction::Sigmoid);
    }

    #[test]
    fn loss_uses_snake_case_names() {
        let json = r#"{"name": "x", "input_neurons": 1, "layers": [], "loss": "cross_entropy", "seed": 9}"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.loss, LossType::CrossEntropy);
        assert_eq!(spec.seed, Some(9));
    }
}

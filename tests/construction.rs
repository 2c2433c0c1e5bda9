use rand::{rngs::StdRng, SeedableRng};
use swan::{ActivationFunction, LayerSpec, LossType, Network, NetworkSpec, SwanError};

const ACTIVATIONS: [ActivationFunction; 4] = [
    ActivationFunction::ReLU,
    ActivationFunction::Sigmoid,
    ActivationFunction::Tanh,
    ActivationFunction::Softmax,
];

#[test]
fn layer_shapes_follow_their_predecessor() {
    let widths = [7, 1, 12, 3, 3, 9];
    let mut network = Network::new(5).unwrap();

    for (n, &width) in widths.iter().enumerate() {
        network.add_layer(width, ACTIVATIONS[n % ACTIVATIONS.len()]).unwrap();
        assert_eq!(network.len(), n + 1);
    }

    let mut previous = network.input_neurons();
    for (layer, &width) in network.layers().iter().zip(widths.iter()) {
        assert_eq!(layer.weights().shape(), (previous, width));
        assert_eq!(layer.biases().shape(), (1, width));
        previous = layer.weights().cols();
    }
    assert_eq!(network.input_neurons(), 5);
}

#[test]
fn rejected_layer_keeps_existing_parameters() {
    let mut network = Network::new(3).unwrap();
    network.add_layer(2, ActivationFunction::Tanh).unwrap();
    network.randomize(&mut StdRng::seed_from_u64(99));
    let before = network.clone();

    assert!(matches!(
        network.add_layer(0, ActivationFunction::ReLU),
        Err(SwanError::InvalidConfiguration(_))
    ));
    assert_eq!(network.len(), 1);
    assert_eq!(network, before);

    network.add_layer(4, ActivationFunction::ReLU).unwrap();
    assert_eq!(network.layers()[1].input_size(), 2);
}

#[test]
fn new_layers_start_zero_filled() {
    let mut network = Network::new(4).unwrap();
    network.add_layer(3, ActivationFunction::Sigmoid).unwrap();
    let layer = &network.layers()[0];
    assert!(layer.weights().as_slice().iter().all(|&x| x == 0.0));
    assert!(layer.biases().as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn different_seeds_give_different_parameters() {
    let mut a = Network::new(4).unwrap();
    a.add_layer(4, ActivationFunction::ReLU).unwrap();
    let mut b = a.clone();

    a.randomize(&mut StdRng::seed_from_u64(1));
    b.randomize(&mut StdRng::seed_from_u64(2));
    assert_ne!(a, b);
}

#[test]
fn spec_builds_the_same_network_as_manual_calls() {
    let spec = NetworkSpec {
        name: "digits".to_owned(),
        input_neurons: 784,
        layers: vec![
            LayerSpec { neurons: 16, activation: ActivationFunction::ReLU },
            LayerSpec { neurons: 10, activation: ActivationFunction::Sigmoid },
        ],
        loss: LossType::CrossEntropy,
        seed: Some(3),
    };

    let from_spec = Network::from_spec(&spec).unwrap();
    let mut manual = Network::new(784).unwrap();
    manual.add_layer(16, ActivationFunction::ReLU).unwrap();
    manual.add_layer(10, ActivationFunction::Sigmoid).unwrap();
    assert_eq!(from_spec, manual);
}

#[test]
fn spec_with_empty_layer_is_rejected() {
    let spec = NetworkSpec {
        name: "broken".to_owned(),
        input_neurons: 2,
        layers: vec![LayerSpec { neurons: 0, activation: ActivationFunction::ReLU }],
        loss: LossType::MeanSquaredError,
        seed: None,
    };
    assert!(matches!(Network::from_spec(&spec), Err(SwanError::InvalidConfiguration(_))));
}

#[test]
fn saved_network_loads_back_identically() {
    let mut network = Network::new(3).unwrap();
    network.add_layer(2, ActivationFunction::Tanh).unwrap();
    network.add_layer(1, ActivationFunction::Sigmoid).unwrap();
    network.randomize(&mut StdRng::seed_from_u64(11));

    let path = std::env::temp_dir().join(format!("swan-network-{}.json", std::process::id()));
    let path = path.to_str().unwrap().to_owned();
    network.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.input_neurons(), network.input_neurons());
    assert_eq!(loaded.len(), network.len());
    for (a, b) in loaded.layers().iter().zip(network.layers()) {
        assert_eq!(a.activation(), b.activation());
        assert_eq!(a.weights().shape(), b.weights().shape());
        let saved = a.weights().as_slice().iter().chain(a.biases().as_slice());
        let original = b.weights().as_slice().iter().chain(b.biases().as_slice());
        for (x, y) in saved.zip(original) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}

#[test]
fn unload_releases_populated_and_empty_networks() {
    Network::new(1).unwrap().unload();

    let mut network = Network::new(2).unwrap();
    network.add_layer(2, ActivationFunction::ReLU).unwrap();
    network.unload();
}

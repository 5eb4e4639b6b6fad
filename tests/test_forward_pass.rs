// Forward propagation: output shape, hidden-layer bounds, normalization floor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use softnet::activation::normalize;
use softnet::layers::forward;
use softnet::{Network, SampleActivations};

#[test]
fn output_width_matches_topology_and_hidden_layers_are_bounded() {
    let mut rng = StdRng::seed_from_u64(11);
    let topologies = [vec![2, 1], vec![3, 2, 1], vec![16, 8, 6, 4], vec![5, 9, 9, 9, 2]];

    for (seed, sizes) in topologies.iter().enumerate() {
        let network = Network::with_seed(sizes.clone(), seed as u64).unwrap();
        let mut acts = SampleActivations::new(&network.topology);

        for _ in 0..20 {
            let input: Vec<f64> = (0..sizes[0]).map(|_| rng.gen_range(-3.0..3.0)).collect();
            let out = forward(&network.topology, &network.weights, &input, &mut acts).unwrap();
            assert_eq!(out.len(), *sizes.last().unwrap());

            for layer in 1..sizes.len() - 1 {
                for &a in acts.layer(layer) {
                    assert!(a > -1.0 && a < 1.0, "layer {layer} activation {a} out of bounds");
                }
            }
        }
    }
}

#[test]
fn output_is_normalized_to_unit_max() {
    let network = Network::with_seed(vec![4, 6, 3], 5).unwrap();
    let out = network.forward(&[0.2, -0.7, 1.0, 0.0]).unwrap();
    let max = out.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    // The largest value was above the floor, so it divides to exactly 1.
    assert_eq!(max, 1.0);
}

#[test]
fn normalize_below_floor_divides_by_floor() {
    let mut v = vec![0.005];
    normalize(&mut v);
    assert!((v[0] - 0.5).abs() < 1e-12);

    let mut mixed = vec![0.004, -0.002];
    normalize(&mut mixed);
    assert!((mixed[0] - 0.4).abs() < 1e-12);
    assert!((mixed[1] + 0.2).abs() < 1e-12);
}

#[test]
fn forward_is_repeatable_on_a_reused_buffer() {
    let network = Network::with_seed(vec![3, 4, 2], 9).unwrap();
    let mut acts = SampleActivations::new(&network.topology);
    let first = forward(&network.topology, &network.weights, &[1.0, 0.5, -0.5], &mut acts)
        .unwrap()
        .to_vec();
    forward(&network.topology, &network.weights, &[-1.0, 2.0, 0.0], &mut acts).unwrap();
    let again = forward(&network.topology, &network.weights, &[1.0, 0.5, -0.5], &mut acts).unwrap();
    assert_eq!(first.as_slice(), again);
}

#[test]
fn wrong_input_width_is_rejected() {
    let network = Network::with_seed(vec![3, 2], 1).unwrap();
    assert!(network.forward(&[1.0, 2.0]).is_err());
    assert!(network.error(&[1.0, 2.0, 3.0], &[1.0]).is_err());
}

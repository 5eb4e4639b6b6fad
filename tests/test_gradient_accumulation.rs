// Gradient accumulation: worker partitions agree with streaming, and an
// update consumes everything accumulated.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use softnet::layers::forward;
use softnet::train::backprop::backward;
use softnet::train::parallel::accumulate_parallel;
use softnet::{DerivativeMode, GradientAccumulator, Network, SampleActivations, Sgd};

fn batch(network: &Network, n: usize, seed: u64) -> (Vec<SampleActivations>, Vec<Vec<f64>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let sizes = network.topology.sizes();
    let mut slots = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for _ in 0..n {
        let input: Vec<f64> = (0..sizes[0]).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let target: Vec<f64> = (0..network.topology.output_size()).map(|_| rng.gen_range(0.0..1.0)).collect();
        let mut acts = SampleActivations::new(&network.topology);
        forward(&network.topology, &network.weights, &input, &mut acts).unwrap();
        slots.push(acts);
        targets.push(target);
    }
    (slots, targets)
}

fn streaming(network: &Network, slots: &[SampleActivations], targets: &[Vec<f64>], mode: DerivativeMode) -> GradientAccumulator {
    let mut grads = GradientAccumulator::new(&network.topology);
    for (acts, target) in slots.iter().zip(targets) {
        backward(&network.topology, &network.weights, acts, target, mode, &mut grads).unwrap();
    }
    grads
}

fn assert_same_gradients(a: &GradientAccumulator, b: &GradientAccumulator) {
    assert_eq!(a.samples(), b.samples());
    let (sa, sb) = (a.sums(), b.sums());
    for (ma, mb) in sa.all_connections().iter().zip(sb.all_connections()) {
        assert_eq!(ma.len(), mb.len());
        for (x, y) in ma.iter().zip(mb) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }
    for (va, vb) in sa.all_biases().iter().zip(sb.all_biases()) {
        for (x, y) in va.iter().zip(vb) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}

#[test]
fn every_worker_partition_matches_streaming() {
    let network = Network::with_seed(vec![4, 5, 3, 2], 21).unwrap();
    let (slots, targets) = batch(&network, 7, 3);

    for mode in [DerivativeMode::PostActivation, DerivativeMode::PreActivation] {
        let reference = streaming(&network, &slots, &targets, mode);
        assert_eq!(reference.samples(), 7);
        for workers in 1..=9 {
            let merged = accumulate_parallel(&network.topology, &network.weights, &slots, &targets, workers, mode).unwrap();
            assert_same_gradients(&reference, &merged);
        }
    }
}

#[test]
fn merge_order_does_not_matter() {
    let network = Network::with_seed(vec![3, 4, 2], 8).unwrap();
    let (slots, targets) = batch(&network, 6, 4);
    let mode = DerivativeMode::PostActivation;

    let front = streaming(&network, &slots[..2], &targets[..2], mode);
    let back = streaming(&network, &slots[2..], &targets[2..], mode);

    let mut forward_order = front.clone();
    forward_order.merge(&back);
    let mut reverse_order = back.clone();
    reverse_order.merge(&front);

    assert_same_gradients(&forward_order, &reverse_order);
    assert_same_gradients(&forward_order, &streaming(&network, &slots, &targets, mode));
}

#[test]
fn update_consumes_all_accumulated_gradients() {
    let mut network = Network::with_seed(vec![3, 4, 2], 13).unwrap();
    let (slots, targets) = batch(&network, 4, 6);
    let mut grads = streaming(&network, &slots, &targets, DerivativeMode::PostActivation);
    assert!(grads.total() > 0.0);

    let sgd = Sgd::new(0.05).unwrap();
    let before = network.weights.clone();
    sgd.step(&mut network.weights, &mut grads);
    assert_ne!(network.weights, before);
    assert_eq!(grads.total(), 0.0);
    assert_eq!(grads.samples(), 0);

    let after_first = network.weights.clone();
    sgd.step(&mut network.weights, &mut grads);
    assert_eq!(network.weights, after_first);
}

#[test]
fn update_uses_the_averaged_gradient() {
    let mut network = Network::with_seed(vec![2, 3, 1], 2).unwrap();
    let (slots, targets) = batch(&network, 4, 1);
    let mut grads = streaming(&network, &slots, &targets, DerivativeMode::PostActivation);
    let sums = grads.sums().clone();
    let before = network.weights.clone();

    Sgd::new(0.2).unwrap().step(&mut network.weights, &mut grads);

    for t in 0..before.transitions() {
        for ((w0, w1), g) in before.connections(t).iter().zip(network.weights.connections(t)).zip(sums.connections(t)) {
            assert_relative_eq!(*w1, w0 - 0.2 * g / 4.0, epsilon = 1e-12);
        }
    }
}

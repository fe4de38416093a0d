use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use fashion_mlp::{NetworkBuilder, Sample, UpdateRule};

/// Fake 28x28 "images": each class lights up its own band of rows.
fn synthetic_images(n: usize, rng: &mut StdRng) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let label = i % 10;
            let features = (0..784)
                .map(|px| {
                    let row = px / 28;
                    let base = if row / 3 == label { 0.8 } else { 0.1 };
                    (base + rng.gen_range(-0.1..0.1_f64)).clamp(0.0, 1.0)
                })
                .collect();
            Sample::new(features, label)
        })
        .collect()
}

fn main() -> fashion_mlp::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(0);
    let all = synthetic_images(2_000, &mut rng);
    let (validation, train) = all.split_at(all.len() / 10);

    let mut net = NetworkBuilder::new(&[784, 128, 64, 10])
        .learning_rate(1e-4)
        .build_with_seed(0)?;

    for epoch in 1..=3 {
        let mean_error = net.train_epoch(train, UpdateRule::Adam)?;
        let accuracy = net.accuracy(validation)?;
        info!(epoch, mean_error, accuracy, "epoch");
    }

    Ok(())
}

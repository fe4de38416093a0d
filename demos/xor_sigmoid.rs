use fashion_mlp::{NetworkBuilder, OutputActivation};
use tracing::info;

fn main() -> fashion_mlp::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let xs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let ys = [[0.0], [1.0], [1.0], [0.0]];

    // 2 -> 3 -> 1, Leaky-ReLU hidden layer, sigmoid output.
    let mut net = NetworkBuilder::new(&[2, 3, 1])
        .learning_rate(0.05)
        .momentum(0.5)
        .output_activation(OutputActivation::Sigmoid)
        .build_with_seed(23)?;

    for x in &xs {
        let out = net.feed_forward(x)?;
        info!(input = ?x, output = ?out[out.len() - 1], "untrained");
    }

    let epochs = 10_000;
    for epoch in 0..epochs {
        let mut total = 0.0;
        for (x, y) in xs.iter().zip(&ys) {
            total += net.train(x, y)?;
        }
        if (epoch + 1) % 1_000 == 0 {
            info!(epoch = epoch + 1, avg_error = total / xs.len() as f64, "progress");
        }
    }

    for x in &xs {
        let out = net.feed_forward(x)?;
        info!(input = ?x, output = ?out[out.len() - 1], "trained");
    }

    Ok(())
}

//! Receives, prints and accepts messages from a queue or subscription until none arrives for the
//! receive timeout
//!
//! ```sh
//! cargo run --bin receiver -- <namespace> <entity> <issuer-name> <issuer-key>
//! ```

use std::process::ExitCode;

use servicebus_delivery::SampleArgs;
use servicebus_samples::{init_tracing, receiver_config, Fe2o3Receiver, Result, KEY_ENCODING};

async fn run(args: SampleArgs) -> Result<()> {
    let config = receiver_config();
    let mut receiver = Fe2o3Receiver::connect(&args.address(KEY_ENCODING), &config).await?;

    let drained = receiver.drain(|summary| println!("{summary}")).await;
    receiver.stop().await?;

    let count = drained?;
    println!("Received {count} message(s)");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("{err}");
    }

    let args = match SampleArgs::parse(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

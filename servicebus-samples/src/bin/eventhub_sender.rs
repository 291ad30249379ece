//! Interactive Event Hubs sender
//!
//! Every line read from stdin sends one message. An empty line sends it without a partition key,
//! any other line is used as the partition key and `exit`, in any case, quits. The path may name an event hub
//! or one of its partitions (`<hub>/Partitions/<id>`).
//!
//! ```sh
//! cargo run --bin eventhub_sender -- <namespace> <path> <issuer-name> <issuer-key>
//! ```

use std::process::ExitCode;

use servicebus_delivery::{
    ConsoleLine, DeliveryTracker, MessageFactory, MessageTransport, SampleArgs,
};
use servicebus_samples::{init_tracing, transport_config, Fe2o3Session, Result, KEY_ENCODING};
use tokio::io::{AsyncBufReadExt, BufReader};

const USAGE: &str = "namespace path issuer-name issuer-key";

async fn run(args: SampleArgs) -> Result<()> {
    let config = transport_config();
    let mut session = Fe2o3Session::connect(&args.address(KEY_ENCODING), &config).await?;
    let tracker = DeliveryTracker::new(config.delivery_mode);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut next = 0;
    loop {
        println!("Press Enter to send, type a partition key to send with it, or 'exit' to quit:");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let partition_key = match ConsoleLine::parse(&line) {
            ConsoleLine::Exit => break,
            ConsoleLine::Send(key) => key,
        };

        let message = MessageFactory::event_hub(next, partition_key);
        let report = tracker.send_and_track(&mut session, &message).await;
        match partition_key {
            None => println!("Message ID:sample{next}: {}", report.outcome),
            Some(key) => println!(
                "Message ID:sample{next} (partition key {key}): {}",
                report.outcome
            ),
        }
        next += 1;
    }

    session.stop().await
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("{err}");
    }

    let args = match SampleArgs::parse_with_usage(std::env::args(), USAGE) {
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

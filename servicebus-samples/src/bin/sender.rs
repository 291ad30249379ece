//! Sends one message of each body kind to a queue or topic and reports how each delivery ended
//!
//! ```sh
//! cargo run --bin sender -- <namespace> <entity> <issuer-name> <issuer-key>
//! ```

use std::process::ExitCode;

use servicebus_delivery::{
    BodyKind, DeliveryTracker, Identifier, MessageFactory, MessageTransport, SampleArgs,
};
use servicebus_samples::{init_tracing, transport_config, Fe2o3Session, Result, KEY_ENCODING};

async fn run(args: SampleArgs) -> Result<()> {
    let config = transport_config();
    let mut session = Fe2o3Session::connect(&args.address(KEY_ENCODING), &config).await?;
    let tracker = DeliveryTracker::new(config.delivery_mode);
    let factory = MessageFactory::new(args.entity.clone());

    for kind in BodyKind::ALL {
        let id = Identifier::generate()?;
        let message = factory.build(kind, id)?;

        let report = tracker
            .send_and_track_with(&mut session, &message, || {
                println!("Sent {} with id {}", kind.message_type(), id)
            })
            .await;
        println!("Final send status is: {}", report.outcome);
    }

    session.stop().await
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

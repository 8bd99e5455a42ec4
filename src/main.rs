use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = streamflow::run().await {
        error!("StreamFlow exited with error: {:#}", error);
        std::process::exit(1);
    }
}

use clap::Parser;
use tracing_subscriber::EnvFilter;

use robot_soccer_drive::config::{self, RunOptions};
use robot_soccer_drive::motor::Wiring;
use robot_soccer_drive::motor::bridge::DEFAULT_BAUDRATE;

/// Four-wheel drive command runtime
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address for the HTTP command surface
    #[arg(long, default_value = config::HTTP_ADDR)]
    http_addr: String,

    /// Serial port of the line bridge
    #[arg(long, default_value = config::BRIDGE_PORT)]
    port: String,

    #[arg(long, default_value_t = DEFAULT_BAUDRATE)]
    baud: u32,

    /// Bridge lines as A,B pairs in FL,FR,BL,BR order
    #[arg(long, default_value = "0,1,2,3,4,5,6,7")]
    wiring: Wiring,

    /// Drive in-memory lines instead of the line bridge
    #[arg(long)]
    simulate: bool,

    /// Also accept commands on the zenoh command topic
    #[arg(long)]
    zenoh: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        Self {
            http_addr: args.http_addr,
            bridge_port: args.port,
            baudrate: args.baud,
            wiring: args.wiring,
            simulate: args.simulate,
            zenoh: args.zenoh,
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let options = RunOptions::from(Args::parse());

    if let Err(e) = robot_soccer_drive::runtime::run(&options).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

// Command surface: HTTP routes and an optional zenoh command topic
//
// Every accepted command is applied to completion under the controller lock
// before the next one is considered. Line writes run on the blocking pool
// since the bridge blocks on its serial port. There is no command timeout:
// motion continues until a stop command arrives.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use embedded_hal::digital::OutputPin;
use tracing::{error, info, warn};

// local imports
use crate::config::{RunOptions, TOPIC_CMD_MOTION, TOPIC_RT_MOTION};
use crate::messages::{ErrorReply, MotionAck, MotionCommand};
use crate::motor::{LineBridge, MotionController, MovementIntent, WheelForces};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const INDEX_HTML: &str = include_str!("index.html");

pub struct Runtime<P: OutputPin> {
    controller: Mutex<MotionController<P>>,
}

impl<P: OutputPin> Runtime<P> {
    pub fn new(controller: MotionController<P>) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    /// Apply one command
    pub fn on_command(&self, intent: MovementIntent) -> Result<WheelForces, P::Error> {
        // Every apply overwrites all four wheels
        let mut controller = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        controller.apply_motion(intent)
    }

    /// Last commanded wheel forces
    pub fn forces(&self) -> WheelForces {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .forces()
    }
}

/// Apply one command on the blocking pool
pub async fn apply_command<P>(
    runtime: &Arc<Runtime<P>>,
    intent: MovementIntent,
) -> Result<WheelForces, BoxError>
where
    P: OutputPin + Send + 'static,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let runtime = Arc::clone(runtime);
    let forces = tokio::task::spawn_blocking(move || runtime.on_command(intent)).await??;
    Ok(forces)
}

/// Decode a zenoh command payload. Anything that does not decode stops the base.
pub fn decode_command(payload: &[u8]) -> MovementIntent {
    match serde_json::from_slice::<MotionCommand>(payload) {
        Ok(cmd) => cmd.action,
        Err(e) => {
            warn!("Failed to parse command ({}), stopping", e);
            MovementIntent::Stop
        }
    }
}

pub fn router<P>(runtime: Arc<Runtime<P>>) -> Router
where
    P: OutputPin + Send + 'static,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/{action}", get(command_handler::<P>))
        .fallback(not_found_handler)
        .with_state(runtime)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn command_handler<P>(
    State(runtime): State<Arc<Runtime<P>>>,
    Path(action): Path<String>,
) -> Response
where
    P: OutputPin + Send + 'static,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let Some(intent) = MovementIntent::from_route(&action) else {
        warn!("Unknown action: {}", action);
        return not_found_handler().await;
    };

    match apply_command(&runtime, intent).await {
        // Echo the route as given, so `/left` acks `left`
        Ok(_) => (StatusCode::OK, Json(MotionAck::echo(&action))).into_response(),
        Err(e) => {
            error!("Failed to apply {}: {}", intent.name(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReply::new(e.to_string())),
            )
                .into_response()
        }
    }
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorReply::not_found())).into_response()
}

async fn serve_zenoh<P>(runtime: Arc<Runtime<P>>) -> Result<(), BoxError>
where
    P: OutputPin + Send + 'static,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    let subscriber = session.declare_subscriber(TOPIC_CMD_MOTION).await?;
    let pub_ack = session.declare_publisher(TOPIC_RT_MOTION).await?;

    info!("Subscribed to: {}", TOPIC_CMD_MOTION);
    info!("Publishing to: {}", TOPIC_RT_MOTION);

    while let Ok(sample) = subscriber.recv_async().await {
        let payload = sample.payload().to_bytes();
        let intent = decode_command(&payload);

        match apply_command(&runtime, intent).await {
            Ok(_) => {
                let ack_json = serde_json::to_string(&MotionAck::from(intent))?;
                pub_ack.put(ack_json).await?;
            }
            Err(e) => error!("Failed to apply {}: {}", intent.name(), e),
        }
    }

    warn!("Zenoh command subscriber closed");
    Ok(())
}

/// Run a command source; if it finishes cleanly, stay pending so the other sources keep serving
async fn until_error<F>(source: F) -> Result<(), BoxError>
where
    F: Future<Output = Result<(), BoxError>>,
{
    source.await?;
    std::future::pending().await
}

/// Serve commands until Ctrl-C, then stop the wheels
pub async fn serve<P>(runtime: Arc<Runtime<P>>, options: &RunOptions) -> Result<(), BoxError>
where
    P: OutputPin + Send + 'static,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(&options.http_addr).await?;
    info!("HTTP command surface listening on {}", options.http_addr);

    let http = axum::serve(listener, router(runtime.clone())).into_future();

    tokio::select! {
        res = http => res?,
        res = until_error(serve_zenoh(runtime.clone())), if options.zenoh => res?,
        _ = tokio::signal::ctrl_c() => info!("Ctrl-C received"),
    }

    info!("Shutting down, stopping wheels");
    if let Err(e) = runtime.on_command(MovementIntent::Stop) {
        warn!("Failed to stop wheels: {}", e);
    }
    Ok(())
}

pub async fn run(options: &RunOptions) -> Result<(), BoxError> {
    if options.simulate {
        info!("Simulation mode: driving in-memory lines");
        let (controller, _probes) = MotionController::simulated();
        serve(Arc::new(Runtime::new(controller)), options).await
    } else {
        let bridge =
            LineBridge::open_with_baudrate(&options.bridge_port, options.baudrate)?.shared();
        let controller = MotionController::bridged(&bridge, &options.wiring)?;
        serve(Arc::new(Runtime::new(controller)), options).await
    }
}

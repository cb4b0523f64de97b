// Keyboard teleop over zenoh
// W/S forward/backward, A/D strafe, Q/E forward diagonals, Z/C backward diagonals,
// J/L rotate, Space stop, Esc quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use robot_soccer_drive::config::TOPIC_CMD_MOTION;
use robot_soccer_drive::messages::MotionCommand;
use robot_soccer_drive::motor::MovementIntent;

const INPUT_TIMEOUT_MS: u64 = 150; // Send stop after this much time with no movement key

fn intent_for_key(code: KeyCode) -> Option<MovementIntent> {
    let intent = match code {
        KeyCode::Char('w') => MovementIntent::Forward,
        KeyCode::Char('s') => MovementIntent::Backward,
        KeyCode::Char('a') => MovementIntent::StrafeLeft,
        KeyCode::Char('d') => MovementIntent::StrafeRight,
        KeyCode::Char('q') => MovementIntent::DiagForwardLeft,
        KeyCode::Char('e') => MovementIntent::DiagForwardRight,
        KeyCode::Char('z') => MovementIntent::DiagBackwardLeft,
        KeyCode::Char('c') => MovementIntent::DiagBackwardRight,
        KeyCode::Char('j') => MovementIntent::RotateLeft,
        KeyCode::Char('l') => MovementIntent::RotateRight,
        KeyCode::Char(' ') => MovementIntent::Stop,
        _ => return None,
    };
    Some(intent)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_MOTION).await?;

    info!("Controls: WASD=move, Q/E/Z/C=diagonals, J/L=rotate, Space=stop, Esc=quit");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    // Leave the robot stopped whatever happened
    publish(&publisher, MovementIntent::Stop).await?;
    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut current = MovementIntent::Stop;
    let mut last_movement_input = Instant::now();

    loop {
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                if code == KeyCode::Esc && pressed {
                    break;
                }

                if let Some(intent) = intent_for_key(code).filter(|_| pressed) {
                    last_movement_input = Instant::now();
                    if intent != current {
                        publish(publisher, intent).await?;
                        current = intent;
                    }
                }
            }
        }

        // Key released (no repeats arriving): the robot keeps moving until told to stop
        if current != MovementIntent::Stop
            && last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS)
        {
            publish(publisher, MovementIntent::Stop).await?;
            current = MovementIntent::Stop;
        }
    }

    Ok(())
}

async fn publish(
    publisher: &zenoh::pubsub::Publisher<'_>,
    action: MovementIntent,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = serde_json::to_string(&MotionCommand { action })?;
    publisher.put(cmd).await?;
    Ok(())
}

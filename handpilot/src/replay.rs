//! Frame replay host — feeds recorded hand observations to the engine.
//!
//! Input is one s-expression per line:
//!
//! ```text
//! (:hands ((:label "right" :joints ((0.5 0.9 0.0) (0.45 0.8 -0.01) ...))))
//! ```
//!
//! `()` or an empty `:hands` list is a frame without hands.  Blank lines and
//! lines starting with `;` are skipped.  Supports fixed frame pacing, signal
//! handling and periodic status logging.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use lexpr::Value;
use tracing::{debug, info, warn};

use crate::engine::GestureEngine;
use crate::hand::{HandObservation, Landmark, TrackedHand};
use crate::sexp::{as_number, get_keyword, get_value, list_items};
use crate::sink::{InputSink, SettingSink};

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
pub fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

// ── Frame parsing ──────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed s-expression: {0}")]
    Parse(String),

    #[error("frame is not a plist")]
    NotAList,

    #[error("frame has no :hands entry")]
    MissingHands,
}

/// Parse one frame record.  Hands without exactly 21 numeric joint triples
/// are dropped.
pub fn parse_frame(line: &str) -> Result<Vec<TrackedHand>, FrameError> {
    let value = lexpr::from_str(line).map_err(|e| FrameError::Parse(e.to_string()))?;
    match value {
        Value::Null | Value::Nil => return Ok(Vec::new()),
        Value::Cons(_) => {}
        _ => return Err(FrameError::NotAList),
    }
    let hands = get_value(&value, "hands").ok_or(FrameError::MissingHands)?;
    Ok(list_items(hands).into_iter().filter_map(parse_hand).collect())
}

fn parse_hand(value: &Value) -> Option<TrackedHand> {
    // A missing label is left for the role resolver to reject.
    let label = get_keyword(value, "label").unwrap_or_default();
    let Some(joints) = get_value(value, "joints") else {
        debug!("Dropping hand {:?} without joints", label);
        return None;
    };

    let landmarks: Option<Vec<Landmark>> = list_items(joints)
        .into_iter()
        .map(parse_landmark)
        .collect();
    let Some(landmarks) = landmarks else {
        debug!("Dropping hand {:?} with a non-numeric joint", label);
        return None;
    };
    let observation = HandObservation::from_joints(&landmarks)?;
    Some(TrackedHand::new(label, observation))
}

fn parse_landmark(value: &Value) -> Option<Landmark> {
    let coords: Vec<f64> = list_items(value)
        .into_iter()
        .map(as_number)
        .collect::<Option<_>>()?;
    match coords.as_slice() {
        [x, y, z] => Some(Landmark::new(*x as f32, *y as f32, *z as f32)),
        _ => None,
    }
}

// ── Replay loop ────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Delay between frames; `None` replays as fast as possible.
    pub frame_interval: Option<Duration>,
    pub status_interval: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_interval: None,
            status_interval: Duration::from_secs(10),
        }
    }
}

/// Counters reported at the end of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: u64,
    pub skipped: u64,
}

/// Replay every frame from `reader` through `engine`.
///
/// The engine is always shut down on return so a held button is released,
/// including when reading fails.
pub fn run<I, S, R>(
    engine: &mut GestureEngine<I, S>,
    reader: R,
    config: &ReplayConfig,
) -> anyhow::Result<ReplaySummary>
where
    I: InputSink,
    S: SettingSink,
    R: BufRead,
{
    let mut summary = ReplaySummary::default();
    let mut last_status_log = Instant::now();
    let result = replay_lines(engine, reader, config, &mut summary, &mut last_status_log);

    engine.shutdown();
    info!(
        "Replay finished: {} frames, {} skipped lines",
        summary.frames, summary.skipped
    );
    result.map(|()| summary)
}

fn replay_lines<I, S, R>(
    engine: &mut GestureEngine<I, S>,
    reader: R,
    config: &ReplayConfig,
    summary: &mut ReplaySummary,
    last_status_log: &mut Instant,
) -> anyhow::Result<()>
where
    I: InputSink,
    S: SettingSink,
    R: BufRead,
{
    for (index, line) in reader.lines().enumerate() {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            engine.stop();
            break;
        }
        if engine.is_stopped() {
            info!("Engine stopped, leaving replay loop");
            break;
        }

        let line = line.with_context(|| format!("reading frame line {}", index + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        match parse_frame(line) {
            Ok(hands) => engine.process(&hands),
            Err(e) => {
                warn!("Skipping frame line {}: {}", index + 1, e);
                summary.skipped += 1;
                continue;
            }
        }
        summary.frames += 1;

        if last_status_log.elapsed() >= config.status_interval {
            info!("Status: {}", engine.status_sexp());
            *last_status_log = Instant::now();
        }

        if let Some(interval) = config.frame_interval {
            std::thread::sleep(interval);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::control::ControllerMode;
    use crate::hand::fingers::hand_with_fingers;
    use crate::sink::testing::{FakeSettings, RecordingInput};
    use std::io::Cursor;

    fn frame_line(label: &str, obs: &HandObservation) -> String {
        let joints: Vec<String> = obs
            .joints()
            .iter()
            .map(|j| format!("({} {} {})", j.x, j.y, j.z))
            .collect();
        format!("(:hands ((:label \"{}\" :joints ({}))))", label, joints.join(" "))
    }

    fn engine() -> GestureEngine<RecordingInput, FakeSettings> {
        GestureEngine::new(
            EngineConfig::default(),
            RecordingInput::default(),
            FakeSettings::default(),
        )
    }

    fn fist() -> HandObservation {
        hand_with_fingers(false, false, false, false)
    }

    #[test]
    fn test_parse_frame_round_trip() {
        let obs = fist();
        let hands = parse_frame(&frame_line("right", &obs)).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].label, "right");
        assert_eq!(hands[0].observation, obs);
    }

    #[test]
    fn test_parse_empty_frames() {
        assert!(parse_frame("()").unwrap().is_empty());
        assert!(parse_frame("(:hands ())").unwrap().is_empty());
    }

    #[test]
    fn test_parse_two_hands() {
        let a = frame_line("left", &fist());
        let b = frame_line("right", &fist());
        // Splice the second hand into the first frame's list.
        let hand_b = &b["(:hands (".len()..b.len() - 2];
        let line = format!("{} {}))", &a[..a.len() - 2], hand_b);
        let hands = parse_frame(&line).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].label, "left");
        assert_eq!(hands[1].label, "right");
    }

    #[test]
    fn test_wrong_joint_count_drops_hand() {
        let hands = parse_frame("(:hands ((:label \"right\" :joints ((0 0 0) (1 1 1)))))").unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn test_non_numeric_joint_drops_hand() {
        let line = frame_line("right", &fist()).replacen("(0.5 0.9 0)", "(a b c)", 1);
        assert!(parse_frame(&line).unwrap().is_empty());
    }

    #[test]
    fn test_missing_label_is_kept_for_resolver() {
        let line = frame_line("right", &fist()).replace(":label \"right\" ", "");
        let hands = parse_frame(&line).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].label, "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_frame("(:hands"), Err(FrameError::Parse(_))));
        assert!(matches!(parse_frame("42"), Err(FrameError::NotAList)));
        assert!(matches!(parse_frame("(:frame 1)"), Err(FrameError::MissingHands)));
    }

    #[test]
    fn test_run_releases_drag_at_end() {
        let line = frame_line("right", &fist());
        let input: String = std::iter::repeat(format!("{}\n", line)).take(8).collect();

        let mut e = engine();
        let summary = run(&mut e, Cursor::new(input), &ReplayConfig::default()).unwrap();
        assert_eq!(summary.frames, 8);
        assert_eq!(e.input().downs(), 1);
        assert_eq!(e.input().ups(), 1);
        assert!(e.is_stopped());
        assert_eq!(e.current_mode(), ControllerMode::Idle);
    }

    #[test]
    fn test_run_skips_comments_and_bad_lines() {
        let line = frame_line("right", &fist());
        let input = format!("; recorded session\n\n{}\n(oops\n{}\n()\n", line, line);

        let mut e = engine();
        let summary = run(&mut e, Cursor::new(input), &ReplayConfig::default()).unwrap();
        assert_eq!(summary, ReplaySummary { frames: 3, skipped: 1 });
        assert_eq!(e.frames(), 3);
    }

    #[test]
    fn test_run_honours_stop() {
        let line = frame_line("right", &fist());
        let input: String = std::iter::repeat(format!("{}\n", line)).take(8).collect();

        let mut e = engine();
        e.stop_handle().stop();
        let summary = run(&mut e, Cursor::new(input), &ReplayConfig::default()).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(e.frames(), 0);
    }

    #[test]
    fn test_frame_error_display() {
        assert_eq!(FrameError::MissingHands.to_string(), "frame has no :hands entry");
    }
}

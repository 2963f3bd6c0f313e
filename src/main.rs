// What you SEE:
// • The live mirrored camera feed fills the window.
// • Your hand wears a skeleton overlay; the index fingertip gets a dot, and
//   the motion since last frame is traced (bold green once it counts as a swipe).
// • Snake and food sit on top as translucent cells; swipe to steer.
// • R restarts from the GAME OVER screen. ESC quits.
//
// Run with --sim to steer with the mouse, --hand to insist on the real tracker.

mod camera;
mod config;
mod draw;
mod error;
mod game;
mod gamma;
mod gesture;
mod tracker;
mod types;

use camera::CameraCapture;
use config::GameConfig;
use draw::{
    Drawer, draw_disc, draw_game_over_banner, draw_hand, draw_text_5x7, draw_thick_line,
    render_game,
};
use error::Error;
use game::SnakeGame;
use gamma::GammaLut;
use gesture::SwipeClassifier;
use std::time::{Duration, Instant};
use tracker::{MediaPipeTracker, MouseTracker, Tracker};
use types::{Direction, FrameBuffer, Palette};

fn main() -> Result<(), Error> {
    env_logger::init();

    let force_sim = std::env::args().any(|a| a == "--sim");
    let require_hand = std::env::args().any(|a| a == "--hand");

    println!();
    println!("  Gesture Snake");
    println!("  Steer with index-finger swipes. R restarts after game over, ESC quits.");
    println!();

    /* --- Pick the fingertip source ---
       Real hand tracking when the helper is set up (or demanded with --hand),
       the mouse cursor otherwise so the game is playable anywhere. */
    let mut tracker = if force_sim {
        Tracker::Mouse(MouseTracker::new())
    } else if require_hand {
        Tracker::MediaPipe(MediaPipeTracker::new()?)
    } else if MediaPipeTracker::available() {
        match MediaPipeTracker::new() {
            Ok(t) => Tracker::MediaPipe(t),
            Err(e) => {
                log::warn!("hand tracker unavailable ({e}), using mouse simulation");
                Tracker::Mouse(MouseTracker::new())
            }
        }
    } else {
        Tracker::Mouse(MouseTracker::new())
    };

    println!("  Tracker: {}", tracker.label());
    if matches!(tracker, Tracker::Mouse(_)) {
        println!("  (move the mouse over the window; the cursor plays the fingertip)");
    }
    println!();

    /* --- Camera + window setup ---
       Visual: window opens with the live camera feed. */
    let mut cam = CameraCapture::new(0, 640, 480)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Gesture Snake", w as usize, h as usize)?;

    /* --- Game state, sized to what the camera actually delivers --- */
    let config = GameConfig::new(w as i32, h as i32);
    let tick_interval = config.tick_interval;
    let mut game = SnakeGame::new(config);
    let mut classifier = SwipeClassifier::default();
    let mut current_gesture: Option<Direction> = None;

    /* --- Rendering helpers --- */
    let lut = GammaLut::new();
    let palette = Palette::default();
    let finger_dot_radius: i32 = 10; // visual: size of the fingertip marker

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer {
        width: w as usize,
        height: h as usize,
        pixels: vec![0u32; (w as usize) * (h as usize)],
    };

    /* --- HUD / FPS / clocks --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_tick = Instant::now();
    let mut had_hand = false;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Grab a fresh live frame (blocks until the camera has one). */
        let live = cam.next_frame()?;

        /* 2) Inputs: R restarts, but only from the game-over screen. */
        if drawer.r_pressed_once() && game.is_over() {
            game.reset();
            current_gesture = None;
            log::info!("game restarted");
        }

        /* 3) Hand tracking on this frame. */
        if let Tracker::Mouse(m) = &mut tracker {
            m.set_cursor(drawer.mouse_pos());
        }
        let hand = tracker.detect(&live)?;
        match (&hand, had_hand) {
            (Some(h), false) => log::debug!("hand acquired: {} ({:.2})", h.handedness, h.confidence),
            (None, true) => log::debug!("hand lost"),
            _ => {}
        }
        had_hand = hand.is_some();
        let fingertip = hand.as_ref().map(|h| h.fingertip_px(live.width, live.height));

        /* 4) Classify the motion since last frame. A swipe sticks as the
           current gesture until a later swipe replaces it. */
        if let Some(dir) = classifier.observe(fingertip) {
            current_gesture = Some(dir);
        }

        /* 5) Advance the game on its own clock, decoupled from frame rate. */
        if last_tick.elapsed() >= tick_interval {
            let was_over = game.is_over();
            game.tick(current_gesture);
            if !was_over && game.is_over() {
                log::info!("game over at score {}", game.score());
            }
            last_tick = Instant::now();
        }

        /* 6) Compose the frame: video, hand, motion trace, board, HUD. */
        screen.pixels.copy_from_slice(&live.pixels);

        if let Some(hand) = &hand {
            draw_hand(&mut screen, hand, &palette);
        }
        if let Some(motion) = classifier.motion() {
            let (thickness, color) =
                if motion.swipe { (3, palette.swipe) } else { (1, palette.trail) };
            draw_thick_line(
                &mut screen,
                motion.from.x,
                motion.from.y,
                motion.to.x,
                motion.to.y,
                thickness,
                color,
            );
        }
        if let Some(tip) = fingertip {
            draw_disc(&mut screen, tip.x, tip.y, finger_dot_radius, palette.finger);
        }

        render_game(&mut screen, &game, &palette, &lut);

        let gesture_label = current_gesture.map_or("NONE", |d| d.label());
        let hud = format!(
            "SCORE: {} | GESTURE: {} | {}",
            game.score(),
            gesture_label,
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, palette.hud);

        if game.is_over() {
            draw_game_over_banner(&mut screen, &palette);
        }

        /* 7) Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;

        /* 8) FPS bookkeeping once per second. */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("fps {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

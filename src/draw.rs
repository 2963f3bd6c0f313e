// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the live camera image.
// 2) Overlay primitives: lines, discs, translucent cells for the game board.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the video.

use crate::error::Error;
use crate::game::SnakeGame;
use crate::gamma::GammaLut;
use crate::tracker::{Hand, HAND_CONNECTIONS, landmark};
use crate::types::{FrameBuffer, Palette};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image (live video).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// One event per R press; main only honors it on the game-over screen.
    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }

    /// Cursor position while it is over the window, None once it leaves.
    /// The mouse tracker maps "cursor gone" to "hand left the frame".
    pub fn mouse_pos(&self) -> Option<(usize, usize)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize))
    }
}

/* ---------- Software drawing: pixels, lines, cells ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the camera image.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Like `draw_line` but stamping a thickness x thickness square at each step.
/// Visual: a bold stroke; the swipe indicator uses 3, the idle trail 1.
pub fn draw_thick_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: u32) {
    if thickness <= 1 {
        draw_line(fb, x0, y0, x1, y1, color);
        return;
    }
    let r = thickness / 2;
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        fill_rect(fb, x0 - r, y0 - r, thickness, thickness, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Opaque axis-aligned rectangle, clipped to the frame.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y.max(0)..(y + h).min(fb.height as i32) {
        let row = yy as usize * fb.width;
        for xx in x.max(0)..(x + w).min(fb.width as i32) {
            fb.pixels[row + xx as usize] = color;
        }
    }
}

/// Translucent rectangle: mixes `color` over the video in linear light.
/// Visual: a tinted pane of glass; the scene stays visible through the cell.
pub fn blend_rect(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: u32,
    alpha: f32,
    lut: &GammaLut,
) {
    for yy in y.max(0)..(y + h).min(fb.height as i32) {
        let row = yy as usize * fb.width;
        for xx in x.max(0)..(x + w).min(fb.width as i32) {
            let idx = row + xx as usize;
            fb.pixels[idx] = lut.blend(fb.pixels[idx], color, alpha);
        }
    }
}

/// Filled circle centered at (cx,cy).
/// Visual: the solid dot that rides on the fingertip.
pub fn draw_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(fb, cx + dx, cy + dy, color);
            }
        }
    }
}

/* ---------- Scene pieces: hand skeleton, game board, banner ---------- */

/// Draw the detected hand: bones first, joints on top.
pub fn draw_hand(fb: &mut FrameBuffer, hand: &Hand, palette: &Palette) {
    for (a, b) in HAND_CONNECTIONS {
        let pa = hand.landmark_px(a, fb.width, fb.height);
        let pb = hand.landmark_px(b, fb.width, fb.height);
        draw_line(fb, pa.x, pa.y, pb.x, pb.y, palette.bone);
    }
    for i in 0..landmark::COUNT {
        let p = hand.landmark_px(i, fb.width, fb.height);
        draw_disc(fb, p.x, p.y, 2, palette.joint);
    }
}

/// Draw food and snake as translucent cells over the video.
/// The head gets its own shade so you can tell which way you are growing.
pub fn render_game(fb: &mut FrameBuffer, game: &SnakeGame, palette: &Palette, lut: &GammaLut) {
    let block = game.config().block;

    let food = game.food();
    blend_rect(fb, food.x, food.y, block, block, palette.food, palette.cell_alpha, lut);

    for (i, cell) in game.body().iter().enumerate() {
        let color = if i == 0 { palette.snake_head } else { palette.snake_body };
        blend_rect(fb, cell.x, cell.y, block, block, color, palette.cell_alpha, lut);
    }
}

/// Centered two-line game-over message.
pub fn draw_game_over_banner(fb: &mut FrameBuffer, palette: &Palette) {
    let title = "GAME OVER";
    let hint = "PRESS R TO RESTART";

    let cx = fb.width as i32 / 2;
    let cy = fb.height as i32 / 2;

    let tw = text_width_5x7(title, 3);
    draw_text_5x7_scaled(fb, cx - tw / 2, cy - 40, title, palette.banner, 3);

    let hw = text_width_5x7(hint, 2);
    draw_text_5x7_scaled(fb, cx - hw / 2, cy + 4, hint, palette.hud, 2);
}

/* ---------- 5x7 bitmap font (uppercase HUD charset) ---------- */

/// Return a 5x7 glyph bitmap for the HUD character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase A..Z
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b11011,0b10001),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation: space, vertical bar, colon, dot, dash, bang
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b01110,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),

        _ => None,
    }
}

/// Draw a single glyph at (x,y), each font pixel as a scale x scale block.
/// Visual: the glyph in the chosen color over a 1-block black shadow.
fn draw_char_5x7_scaled(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass: offset by one block in black to improve readability
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let gx = x + rx as i32 * scale + scale;
                    let gy = y + ry as i32 * scale + scale;
                    fill_rect(fb, gx, gy, scale, scale, 0x00000000);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let gx = x + rx as i32 * scale;
                    let gy = y + ry as i32 * scale;
                    fill_rect(fb, gx, gy, scale, scale, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs at normal size.
/// Visual: a compact HUD string; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, color: u32) {
    draw_text_5x7_scaled(fb, x, y, text, color, 1);
}

/// Same, magnified by an integer factor.
pub fn draw_text_5x7_scaled(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7_scaled(fb, x, y, ch, color, scale);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Rendered width of `text`, without the trailing spacing column.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer { width: w, height: h, pixels: vec![0; w * h] }
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut fb = frame(8, 8);
        put_pixel(&mut fb, -1, 3, 0xFF);
        put_pixel(&mut fb, 3, -1, 0xFF);
        put_pixel(&mut fb, 8, 0, 0xFF);
        put_pixel(&mut fb, 0, 8, 0xFF);
        assert!(fb.pixels.iter().all(|&p| p == 0));

        put_pixel(&mut fb, 2, 1, 0xFF);
        assert_eq!(fb.pixels[1 * 8 + 2], 0xFF);
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut fb = frame(8, 8);
        fill_rect(&mut fb, -4, -4, 6, 6, 0xAB);
        // 2x2 corner painted, nothing else
        let painted = fb.pixels.iter().filter(|&&p| p == 0xAB).count();
        assert_eq!(painted, 4);
        assert_eq!(fb.pixels[0], 0xAB);
        assert_eq!(fb.pixels[1 * 8 + 1], 0xAB);
        assert_eq!(fb.pixels[2 * 8 + 2], 0);
    }

    #[test]
    fn blend_rect_full_alpha_behaves_like_fill() {
        let lut = GammaLut::new();
        let mut fb = frame(8, 8);
        blend_rect(&mut fb, 1, 1, 2, 2, 0x00C80000, 1.0, &lut);
        assert_eq!(fb.pixels[1 * 8 + 1], 0x00C80000);
        assert_eq!(fb.pixels[0], 0);
    }

    #[test]
    fn disc_is_clipped_and_centered() {
        let mut fb = frame(16, 16);
        draw_disc(&mut fb, 0, 0, 5, 0x11); // partly off-frame, must not panic
        draw_disc(&mut fb, 8, 8, 2, 0x22);
        assert_eq!(fb.pixels[8 * 16 + 8], 0x22);
        assert_eq!(fb.pixels[0], 0x11);
    }

    #[test]
    fn thick_line_covers_both_endpoints() {
        let mut fb = frame(32, 32);
        draw_thick_line(&mut fb, 4, 4, 20, 10, 3, 0x33);
        assert_eq!(fb.pixels[4 * 32 + 4], 0x33);
        assert_eq!(fb.pixels[10 * 32 + 20], 0x33);
    }

    #[test]
    fn hud_charset_is_complete() {
        for ch in "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 |:.-!".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
        assert!(glyph5x7('~').is_none());
    }

    #[test]
    fn text_width_matches_advance() {
        assert_eq!(text_width_5x7("", 1), 0);
        assert_eq!(text_width_5x7("A", 1), 5);
        assert_eq!(text_width_5x7("AB", 1), 11);
        assert_eq!(text_width_5x7("AB", 3), 33);
    }
}

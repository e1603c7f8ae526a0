//! Software-rendered stage window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌───────────────────────────────────────────┬──────────────────┐
//! │ STATUS BANNER                             │  KEYPOINT        │
//! │                                           │  READOUT         │
//! │   [animation overlay]                     │                  │
//! │        o   o                              │  nose    x   y   │
//! │      skeleton + markers                   │  leftEye x   y   │
//! │        |   |                              │  ...             │
//! │                                           │                  │
//! │ key legend                                │                  │
//! └───────────────────────────────────────────┴──────────────────┘
//! ```
//!
//! The window doubles as the input device for the interactive pose
//! source: posture keys are translated to [`SimInput`] events and sent
//! down a channel, which keeps the event loop decoupled from the
//! synthetic-skeleton logic.

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::sync::mpsc::Sender;

use pose_gesture::AnimationName;
use pose_stream::{filter, PoseEstimate};

use crate::readout::ReadoutTable;
use crate::source::{SimInput, SimPosture};
use crate::stage::{AnimationState, Stage};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 720;
const PANEL_W:   usize = 300;
const VIEW_W:    usize = WIN_W - PANEL_W;
const BANNER_H:  usize = 48;
const LEGEND_Y:  usize = WIN_H - 18;

const BG_COLOR:   u32 = 0xFF101820;
const VIEW_BG:    u32 = 0xFF182430;
const PANEL_BG:   u32 = 0xFF0E1A2A;
const BANNER_BG:  u32 = 0xFF0F3050;
const MARKER_RED: u32 = 0xFFFF2020;
const BONE_RED:   u32 = 0xFFC03030;
const TEXT_MAIN:  u32 = 0xFFE8E8E8;
const TEXT_DIM:   u32 = 0xFF8090A0;
const TEXT_GOLD:  u32 = 0xFFFFD700;
const SUN_GOLD:   u32 = 0xFFFFC020;
const RAIN_BLUE:  u32 = 0xFF50A0FF;
const CLOUD_GREY: u32 = 0xFF607080;
const WALLY_BODY: u32 = 0xFFE05040;
const WALLY_SKIN: u32 = 0xFFF0C090;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Pose Stage — gesture to animation",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input, forwarding posture keys to the interactive
    /// pose source. Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) {
            return false;
        }

        let posture = if one_shot(&self.window, Key::U) {
            Some(SimPosture::HandsUp)
        } else if one_shot(&self.window, Key::J) {
            Some(SimPosture::HandsDown)
        } else if one_shot(&self.window, Key::T) {
            Some(SimPosture::TPose)
        } else if one_shot(&self.window, Key::N) {
            Some(SimPosture::Neutral)
        } else if one_shot(&self.window, Key::O) {
            Some(SimPosture::Occluded)
        } else {
            None
        };

        if let Some(p) = posture {
            let _ = self.sim_tx.send(SimInput::SetPosture(p));
        }

        true
    }

    /// Render one frame from the current estimate, stage, and table.
    pub fn render(
        &mut self,
        estimate: Option<&PoseEstimate>,
        stage: &Stage,
        table: &ReadoutTable,
        marker_gate: f32,
    ) {
        self.buf.fill(BG_COLOR);

        // ── Viewport backdrop (stand-in for the camera frame) ─────────────
        self.fill_rect(0, BANNER_H, VIEW_W, WIN_H - BANNER_H, VIEW_BG);

        // ── Animation overlays (hidden ones are skipped entirely) ─────────
        self.draw_sunshine(stage.animation(AnimationName::Sunshine));
        self.draw_rainy(stage.animation(AnimationName::Rainy));
        self.draw_wally(stage.animation(AnimationName::Wally));

        // ── Skeleton bones, then keypoint markers on top ──────────────────
        if let Some(est) = estimate {
            self.draw_skeleton(est, marker_gate);
            self.draw_markers(est, marker_gate);
        }

        // ── Status banner ─────────────────────────────────────────────────
        self.fill_rect(0, 0, VIEW_W, BANNER_H, BANNER_BG);
        self.draw_text_scaled(stage.status(), 16, 14, 4, TEXT_GOLD);

        // ── Readout panel ─────────────────────────────────────────────────
        self.draw_panel(table);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_text(
            "U=HANDS UP  J=HANDS DOWN  T=T POSE  N=NEUTRAL  O=OCCLUDE  Q=QUIT",
            10,
            LEGEND_Y,
            TEXT_DIM,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Markers and skeleton ──────────────────────────────────────────────

    /// A dot for every keypoint whose score clears the gate.
    fn draw_markers(&mut self, est: &PoseEstimate, gate: f32) {
        for kp in &est.keypoints {
            if filter::passes(kp, gate) {
                self.fill_circle(kp.x as isize, kp.y as isize, 4, MARKER_RED);
            }
        }
    }

    /// Bone lines between connected keypoints, both ends above the gate.
    fn draw_skeleton(&mut self, est: &PoseEstimate, gate: f32) {
        for i in 0..est.skeleton.len() {
            if let Some((a, b)) = est.bone(i) {
                if filter::passes(a, gate) && filter::passes(b, gate) {
                    self.draw_line(
                        a.x as isize,
                        a.y as isize,
                        b.x as isize,
                        b.y as isize,
                        BONE_RED,
                    );
                }
            }
        }
    }

    // ── Animations ────────────────────────────────────────────────────────

    /// Sun disc with slowly rotating rays, top of the viewport.
    fn draw_sunshine(&mut self, anim: &AnimationState) {
        if !anim.is_visible() {
            return;
        }
        let (cx, cy) = (110isize, 130isize);
        self.fill_circle(cx, cy, 34, SUN_GOLD);

        let spin = anim.frame() * 0.02;
        for i in 0..12 {
            let angle = spin + i as f32 * (std::f32::consts::TAU / 12.0);
            let (s, c) = angle.sin_cos();
            let x0 = cx + (c * 42.0) as isize;
            let y0 = cy + (s * 42.0) as isize;
            let x1 = cx + (c * 62.0) as isize;
            let y1 = cy + (s * 62.0) as isize;
            self.draw_line(x0, y0, x1, y1, SUN_GOLD);
        }
    }

    /// Cloud band with falling rain streaks across the viewport.
    fn draw_rainy(&mut self, anim: &AnimationState) {
        if !anim.is_visible() {
            return;
        }
        for i in 0..5 {
            let x = 40 + i * 130;
            self.fill_rect(x, 70, 90, 22, CLOUD_GREY);
            self.fill_rect(x + 18, 58, 50, 14, CLOUD_GREY);
        }

        let fall = anim.frame() * 6.0;
        for i in 0..24usize {
            let x = (24 + i * 27) as isize;
            let span = (WIN_H - BANNER_H - 120) as f32;
            let y = BANNER_H as isize
                + 100
                + ((i as f32 * 97.0 + fall) % span) as isize;
            self.draw_line(x, y, x - 3, y + 14, RAIN_BLUE);
        }
    }

    /// Wally: a blocky character bouncing and waving near the floor.
    fn draw_wally(&mut self, anim: &AnimationState) {
        if !anim.is_visible() {
            return;
        }
        let bounce = ((anim.frame() * 0.08).sin().abs() * 56.0) as isize;
        let (cx, base) = (560isize, 640isize);
        let top = base - 90 - bounce;

        // body and head
        self.fill_rect((cx - 18) as usize, (top + 26) as usize, 36, 50, WALLY_BODY);
        self.fill_circle(cx, top + 12, 14, WALLY_SKIN);

        // waving arm and steady arm
        let wave = (anim.frame() * 0.25).sin() * 18.0;
        self.draw_line(cx + 18, top + 34, cx + 40, top + 10 - wave as isize, WALLY_BODY);
        self.draw_line(cx - 18, top + 34, cx - 36, top + 58, WALLY_BODY);

        // legs
        self.draw_line(cx - 10, top + 76, cx - 12, top + 90 + bounce, WALLY_BODY);
        self.draw_line(cx + 10, top + 76, cx + 12, top + 90 + bounce, WALLY_BODY);
    }

    // ── Readout panel ─────────────────────────────────────────────────────

    fn draw_panel(&mut self, table: &ReadoutTable) {
        self.fill_rect(VIEW_W, 0, PANEL_W, WIN_H, PANEL_BG);
        self.draw_text("KEYPOINT READOUT", VIEW_W + 14, 16, TEXT_GOLD);
        self.draw_text("PART", VIEW_W + 14, 40, TEXT_DIM);
        self.draw_text("X", VIEW_W + 190, 40, TEXT_DIM);
        self.draw_text("Y", VIEW_W + 244, 40, TEXT_DIM);

        let mut y = 62usize;
        for (part, cell) in table.rows() {
            self.draw_text(part.name(), VIEW_W + 14, y, TEXT_MAIN);
            match cell {
                Some(kp) => {
                    self.draw_text(&format!("{:>4.0}", kp.x), VIEW_W + 180, y, TEXT_MAIN);
                    self.draw_text(&format!("{:>4.0}", kp.y), VIEW_W + 234, y, TEXT_MAIN);
                }
                None => {
                    self.draw_text("-", VIEW_W + 190, y, TEXT_DIM);
                    self.draw_text("-", VIEW_W + 244, y, TEXT_DIM);
                }
            }
            y += 24;
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn fill_circle(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham segment.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_text_scaled(text, x, y, 1, color);
    }

    /// Bitmap-font label; each glyph cell is `(3*scale + scale)` wide.
    fn draw_text_scaled(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = glyph_columns(ch.to_ascii_uppercase());
            for (col, &bits) in glyph.iter().enumerate() {
                for row in 0..5usize {
                    if bits & (1 << row) != 0 {
                        self.fill_rect(
                            cx + col * scale,
                            y + row * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font, stored column-wise: three 5-bit column masks per
// glyph, bit 0 = top row.
// ────────────────────────────────────────────────────────────────────────────

fn glyph_columns(c: char) -> [u8; 3] {
    match c {
        '0' => [31, 17, 31],
        '1' => [18, 31, 16],
        '2' => [29, 21, 23],
        '3' => [21, 21, 31],
        '4' => [7, 4, 31],
        '5' => [23, 21, 29],
        '6' => [31, 21, 29],
        '7' => [1, 1, 31],
        '8' => [31, 21, 31],
        '9' => [23, 21, 31],
        'A' => [31, 5, 31],
        'B' => [31, 21, 10],
        'C' => [31, 17, 17],
        'D' => [31, 17, 14],
        'E' => [31, 21, 21],
        'F' => [31, 5, 5],
        'G' => [31, 17, 29],
        'H' => [31, 4, 31],
        'I' => [17, 31, 17],
        'J' => [24, 16, 31],
        'K' => [31, 4, 27],
        'L' => [31, 16, 16],
        'M' => [31, 2, 31],
        'N' => [31, 1, 31],
        'O' => [31, 17, 31],
        'P' => [31, 5, 7],
        'Q' => [15, 9, 23],
        'R' => [31, 5, 26],
        'S' => [23, 21, 29],
        'T' => [1, 31, 1],
        'U' => [31, 16, 31],
        'V' => [15, 16, 15],
        'W' => [31, 8, 31],
        'X' => [27, 4, 27],
        'Y' => [3, 28, 3],
        'Z' => [25, 21, 19],
        '-' => [4, 4, 4],
        '.' => [0, 16, 0],
        ':' => [0, 10, 0],
        '/' => [24, 4, 3],
        '=' => [10, 10, 10],
        '+' => [4, 14, 4],
        ' ' => [0, 0, 0],
        _ => [0, 4, 0], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

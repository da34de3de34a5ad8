//! Geometry and sprite-sheet types shared by the scene, the animator and the gestures.

use serde::{Deserialize, Serialize};

/// Page-space point reported by a pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned rectangle: x, y, width, height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Grow by `m` pixels on every side.
    pub fn inflate(self, m: f64) -> Rect {
        Rect::new(self.x - m, self.y - m, self.w + 2.0 * m, self.h + 2.0 * m)
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    /// Size of a surface whose height fills `viewport_height` while keeping the
    /// image's aspect ratio.
    pub fn fit_to_height(image_width: f64, image_height: f64, viewport_height: f64) -> Self {
        let height = viewport_height.max(0.0);
        let width = if image_height > 0.0 {
            height / image_height * image_width
        } else {
            0.0
        };
        Self { width, height }
    }
}

/// Destination geometry of one runner frame, fixed once the overlay is sized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    pub surface: SurfaceSize,
    pub frame_width: f64,
    pub frame_height: f64,
    pub frame_y: f64,
}

impl FrameLayout {
    pub fn new(surface: SurfaceSize, frame_y_ratio: f64) -> Self {
        Self {
            surface,
            frame_width: surface.height / 15.0,
            frame_height: surface.height / 8.0,
            frame_y: surface.height * frame_y_ratio,
        }
    }
}

/// Source rectangles on the stickman sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    pub run_poses: [Rect; 4],
    pub jump_pose: Rect,
}

pub const RUN_POSES: [Rect; 4] = [
    Rect::new(0.0, 375.0, 80.0, 150.0),
    Rect::new(85.0, 375.0, 80.0, 150.0),
    Rect::new(170.0, 375.0, 80.0, 150.0),
    Rect::new(255.0, 375.0, 80.0, 150.0),
];
pub const JUMP_POSE: Rect = Rect::new(165.0, 0.0, 80.0, 150.0);

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            run_poses: RUN_POSES,
            jump_pose: JUMP_POSE,
        }
    }
}

impl SpriteSheet {
    /// Run pose for a frame index; negative indices wrap the same way.
    pub fn run_pose(&self, frame: i64) -> Rect {
        self.run_poses[frame.rem_euclid(4) as usize]
    }
}

/// Presentation-only zoom applied to the overlay element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn to_css(self) -> String {
        format!(
            "translate3d({}px,{}px,0) scale3d({},{},1)",
            self.translate_x, self.translate_y, self.scale, self.scale
        )
    }
}

// Pointer samples -> drag / double-tap / transform gestures.
use crate::config::GestureConfig;
use crate::model::Point;

/// Recognized gesture, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    DragStart { start: Point, current: Point },
    Drag { current: Point },
    DragEnd { current: Point },
    DoubleTap { at: Point },
    TransformStart { touches: [Point; 2] },
    Pinch { touches: [Point; 2], scale: f64, center: Point },
    TransformEnd { touches: [Point; 2] },
}

#[derive(Clone, Copy, Debug)]
struct SingleTrack {
    start: Point,
    start_ms: f64,
    last: Point,
    dragging: bool,
}

#[derive(Clone, Copy, Debug)]
enum Track {
    None,
    Single(SingleTrack),
    Multi { start_distance: f64, last: [Point; 2] },
    /// A transform ended but fingers remain down; nothing is tracked until all lift.
    Spent,
}

#[derive(Debug)]
pub struct GestureRecognizer {
    cfg: GestureConfig,
    enabled: bool,
    track: Track,
    last_tap: Option<(Point, f64)>,
}

impl GestureRecognizer {
    pub fn new(cfg: GestureConfig) -> Self {
        Self {
            cfg,
            enabled: true,
            track: Track::None,
            last_tap: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops any gesture in flight; nothing is emitted until re-enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.track = Track::None;
            self.last_tap = None;
        }
        self.enabled = enabled;
    }

    /// Pointers went down; `points` holds every pointer currently down.
    pub fn start(&mut self, points: &[Point], now_ms: f64) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if !self.enabled {
            return out;
        }
        match (points.len(), self.track) {
            (0, _) => {}
            (1, Track::None) => {
                self.track = Track::Single(SingleTrack {
                    start: points[0],
                    start_ms: now_ms,
                    last: points[0],
                    dragging: false,
                });
            }
            (1, _) => {}
            (_, Track::Multi { .. }) | (_, Track::Spent) => {}
            (_, track) => {
                if let Track::Single(t) = track {
                    if t.dragging {
                        out.push(GestureEvent::DragEnd { current: t.last });
                    }
                }
                let pair = [points[0], points[1]];
                self.track = Track::Multi {
                    start_distance: pair[0].distance(pair[1]),
                    last: pair,
                };
                out.push(GestureEvent::TransformStart { touches: pair });
            }
        }
        out
    }

    pub fn moved(&mut self, points: &[Point]) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if !self.enabled || points.is_empty() {
            return out;
        }
        match &mut self.track {
            Track::Single(t) => {
                let p = points[0];
                t.last = p;
                if !t.dragging && t.start.distance(p) > self.cfg.drag_min_distance {
                    t.dragging = true;
                    out.push(GestureEvent::DragStart {
                        start: t.start,
                        current: p,
                    });
                }
                if t.dragging {
                    out.push(GestureEvent::Drag { current: p });
                }
            }
            Track::Multi {
                start_distance,
                last,
            } if points.len() >= 2 => {
                let pair = [points[0], points[1]];
                *last = pair;
                let scale = if *start_distance > 0.0 {
                    pair[0].distance(pair[1]) / *start_distance
                } else {
                    1.0
                };
                out.push(GestureEvent::Pinch {
                    touches: pair,
                    scale,
                    center: pair[0].midpoint(pair[1]),
                });
            }
            _ => {}
        }
        out
    }

    /// Pointers lifted; `remaining` holds the pointers still down.
    pub fn end(&mut self, remaining: &[Point], now_ms: f64) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if !self.enabled {
            return out;
        }
        match self.track {
            Track::Single(t) if remaining.is_empty() => {
                self.track = Track::None;
                if t.dragging {
                    out.push(GestureEvent::DragEnd { current: t.last });
                } else if now_ms - t.start_ms <= self.cfg.tap_max_time_ms
                    && t.start.distance(t.last) <= self.cfg.tap_max_distance
                {
                    self.tap(t.last, now_ms, &mut out);
                }
            }
            Track::Multi { last, .. } if remaining.len() < 2 => {
                self.track = if remaining.is_empty() {
                    Track::None
                } else {
                    Track::Spent
                };
                out.push(GestureEvent::TransformEnd { touches: last });
            }
            Track::Spent if remaining.is_empty() => self.track = Track::None,
            _ => {}
        }
        out
    }

    /// Host aborted the pointers (touchcancel): close any open gesture, never a tap.
    pub fn cancel(&mut self) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        if !self.enabled {
            return out;
        }
        match self.track {
            Track::Single(t) if t.dragging => out.push(GestureEvent::DragEnd { current: t.last }),
            Track::Multi { last, .. } => out.push(GestureEvent::TransformEnd { touches: last }),
            _ => {}
        }
        self.track = Track::None;
        out
    }

    fn tap(&mut self, at: Point, now_ms: f64, out: &mut Vec<GestureEvent>) {
        match self.last_tap {
            Some((prev, prev_ms))
                if now_ms - prev_ms <= self.cfg.double_tap_interval_ms
                    && prev.distance(at) <= self.cfg.double_tap_distance =>
            {
                self.last_tap = None;
                out.push(GestureEvent::DoubleTap { at });
            }
            _ => self.last_tap = Some((at, now_ms)),
        }
    }
}

//! Runner animation state machine.
//!
//! The animator owns the overlay [`Surface`] and reacts to [`GestureEvent`]s:
//! dragging moves the runner frame by frame, a double tap makes it jump, and a
//! pinch zooms the overlay element. Only the runner's own rectangle is ever
//! cleared and redrawn.

use crate::model::{FrameLayout, Point, Rect, SpriteSheet, SurfaceSize, ZoomTransform};
use crate::state::gesture::GestureEvent;

/// Drawing target the animator paints on.
pub trait Surface {
    fn size(&self) -> SurfaceSize;
    fn clear_rect(&mut self, area: Rect);
    fn draw_sprite(&mut self, src: Rect, dst: Rect);
    /// Origin for [`Surface::set_transform`], in percent of the surface size.
    fn set_transform_origin(&mut self, x_pct: f64, y_pct: f64);
    /// Visual transform of the whole surface element; pixels are not redrawn.
    fn set_transform(&mut self, transform: ZoomTransform);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Dragging,
    Pinching,
    Jumping,
}

/// Work the host has to carry out on the animator's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Gesture input is now off; call [`SpriteAnimator::land`] after the delay.
    ScheduleLanding { delay_ms: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatorState {
    pub layout: FrameLayout,
    pub frame_x: f64,
    /// Last committed frame; `None` until the first frame is drawn.
    pub frame: Option<i64>,
    pub mode: Mode,
    pub input_enabled: bool,
}

impl AnimatorState {
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            layout,
            frame_x: 0.0,
            frame: None,
            mode: Mode::Idle,
            input_enabled: true,
        }
    }

    pub fn runner_rect(&self) -> Rect {
        Rect::new(
            self.frame_x,
            self.layout.frame_y,
            self.layout.frame_width,
            self.layout.frame_height,
        )
    }

    fn jump_rect(&self) -> Rect {
        let r = self.runner_rect();
        Rect::new(r.x, r.y - 2.0 * r.h, r.w, r.h)
    }

    /// Whether a touch at (x, y) targets the runner. The region is widened past
    /// the frame to tolerate imprecise fingers.
    pub fn is_target(&self, x: f64, y: f64) -> bool {
        let w = self.layout.frame_width;
        let h = self.layout.frame_height;
        let fy = self.layout.frame_y;
        x >= self.frame_x - w * 0.5
            && x <= self.frame_x + w * 1.5
            && y >= fy - h
            && y <= fy + h * 2.0
    }
}

pub struct SpriteAnimator<S: Surface> {
    surface: S,
    sheet: SpriteSheet,
    state: AnimatorState,
    jump_delay_ms: i32,
}

impl<S: Surface> SpriteAnimator<S> {
    pub fn new(surface: S, frame_y_ratio: f64, sheet: SpriteSheet, jump_delay_ms: i32) -> Self {
        let layout = FrameLayout::new(surface.size(), frame_y_ratio);
        Self {
            surface,
            sheet,
            state: AnimatorState::new(layout),
            jump_delay_ms,
        }
    }

    pub fn state(&self) -> &AnimatorState {
        &self.state
    }

    pub fn input_enabled(&self) -> bool {
        self.state.input_enabled
    }

    /// Draw the runner at its starting pose.
    pub fn start(&mut self, initial_frame: i64) {
        if !self.draw_run_frame(initial_frame) {
            log::warn!("initial frame {} does not fit the surface", initial_frame);
        }
    }

    pub fn handle(&mut self, event: GestureEvent) -> Option<Effect> {
        if self.state.mode == Mode::Jumping || !self.state.input_enabled {
            return None;
        }
        match event {
            GestureEvent::DragStart { start, .. } => self.drag_start(start),
            GestureEvent::Drag { current } => self.drag(current),
            GestureEvent::DragEnd { .. } => self.drag_end(),
            GestureEvent::DoubleTap { at } => return self.double_tap(at),
            GestureEvent::TransformStart { touches } => self.transform_start(touches),
            GestureEvent::Pinch { scale, center, .. } => self.pinch(scale, center),
            GestureEvent::TransformEnd { .. } => self.transform_end(),
        }
        None
    }

    fn drag_start(&mut self, start: Point) {
        if self.state.mode == Mode::Idle && self.state.is_target(start.x, start.y) {
            log::debug!("dragstart");
            self.state.mode = Mode::Dragging;
        } else {
            log::debug!("drag ignored at ({}, {})", start.x, start.y);
        }
    }

    fn drag(&mut self, current: Point) {
        if self.state.mode != Mode::Dragging {
            return;
        }
        let target = (current.x / self.state.layout.frame_width).floor() as i64;
        if Some(target) != self.state.frame {
            self.draw_run_frame(target);
        }
    }

    fn drag_end(&mut self) {
        if self.state.mode == Mode::Dragging {
            log::debug!("dragend");
            self.state.mode = Mode::Idle;
        }
    }

    /// Move the runner to `target`. Frames that would leave the surface are
    /// refused without touching state or pixels.
    pub fn draw_run_frame(&mut self, target: i64) -> bool {
        let w = self.state.layout.frame_width;
        let dest_x = w * target as f64;
        if target < 0 || dest_x + w > self.surface.size().width {
            return false;
        }
        if self.state.frame.is_some() {
            self.surface.clear_rect(self.state.runner_rect().inflate(1.0));
        }
        self.state.frame = Some(target);
        self.state.frame_x = dest_x;
        self.paint_run_frame();
        true
    }

    fn paint_run_frame(&mut self) {
        if let Some(frame) = self.state.frame {
            let src = self.sheet.run_pose(frame);
            self.surface.draw_sprite(src, self.state.runner_rect());
        }
    }

    fn double_tap(&mut self, at: Point) -> Option<Effect> {
        if self.state.mode != Mode::Idle || !self.state.is_target(at.x, at.y) {
            return None;
        }
        log::debug!("jump");
        self.state.input_enabled = false;
        self.state.mode = Mode::Jumping;
        self.surface.clear_rect(self.state.runner_rect().inflate(1.0));
        self.surface
            .draw_sprite(self.sheet.jump_pose, self.state.jump_rect());
        Some(Effect::ScheduleLanding {
            delay_ms: self.jump_delay_ms,
        })
    }

    /// Finish a jump: erase the airborne pose, put the runner back on its
    /// plane and accept input again.
    pub fn land(&mut self) {
        if self.state.mode != Mode::Jumping {
            return;
        }
        self.surface.clear_rect(self.state.jump_rect().inflate(1.0));
        self.paint_run_frame();
        self.state.input_enabled = true;
        self.state.mode = Mode::Idle;
    }

    fn transform_start(&mut self, touches: [Point; 2]) {
        if !touches.iter().any(|t| self.state.is_target(t.x, t.y)) {
            return;
        }
        match self.state.mode {
            Mode::Dragging => {
                // pinch takes over the runner
                log::debug!("dragend (pinch)");
                self.state.mode = Mode::Idle;
            }
            Mode::Idle => {}
            _ => return,
        }
        self.state.mode = Mode::Pinching;
        let size = self.surface.size();
        let center = self.state.runner_rect().center();
        let x_pct = if size.width > 0.0 { center.x * 100.0 / size.width } else { 0.0 };
        let y_pct = if size.height > 0.0 { center.y * 100.0 / size.height } else { 0.0 };
        self.surface.set_transform_origin(x_pct, y_pct);
    }

    fn pinch(&mut self, scale: f64, center: Point) {
        if self.state.mode != Mode::Pinching {
            return;
        }
        let runner = self.state.runner_rect().center();
        self.surface.set_transform(ZoomTransform {
            translate_x: center.x - runner.x,
            translate_y: center.y - runner.y,
            scale,
        });
    }

    fn transform_end(&mut self) {
        if self.state.mode == Mode::Pinching {
            log::debug!("transformend");
            self.state.mode = Mode::Idle;
            self.surface.set_transform(ZoomTransform::IDENTITY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JUMP_POSE, RUN_POSES};

    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        Clear(Rect),
        Draw(Rect, Rect),
        Origin(f64, f64),
        Transform(ZoomTransform),
    }

    struct Recording {
        size: SurfaceSize,
        ops: Vec<Op>,
    }

    impl Surface for Recording {
        fn size(&self) -> SurfaceSize {
            self.size
        }
        fn clear_rect(&mut self, area: Rect) {
            self.ops.push(Op::Clear(area));
        }
        fn draw_sprite(&mut self, src: Rect, dst: Rect) {
            self.ops.push(Op::Draw(src, dst));
        }
        fn set_transform_origin(&mut self, x_pct: f64, y_pct: f64) {
            self.ops.push(Op::Origin(x_pct, y_pct));
        }
        fn set_transform(&mut self, transform: ZoomTransform) {
            self.ops.push(Op::Transform(transform));
        }
    }

    // 800 x 1200: frames are 80 x 150 and sit at y = 720
    fn animator() -> SpriteAnimator<Recording> {
        let surface = Recording {
            size: SurfaceSize {
                width: 800.0,
                height: 1200.0,
            },
            ops: Vec::new(),
        };
        let mut a = SpriteAnimator::new(surface, 0.6, SpriteSheet::default(), 500);
        a.start(2);
        a.surface.ops.clear();
        a
    }

    fn ops(a: &mut SpriteAnimator<Recording>) -> Vec<Op> {
        std::mem::take(&mut a.surface.ops)
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn drag_to(a: &mut SpriteAnimator<Recording>, x: f64) {
        a.handle(GestureEvent::Drag { current: pt(x, 760.0) });
    }

    fn begin_drag(a: &mut SpriteAnimator<Recording>) {
        a.handle(GestureEvent::DragStart {
            start: pt(170.0, 760.0),
            current: pt(190.0, 760.0),
        });
        assert_eq!(a.state().mode, Mode::Dragging);
    }

    fn pinch_touches() -> [Point; 2] {
        [pt(170.0, 760.0), pt(400.0, 300.0)]
    }

    #[test]
    fn start_draws_initial_pose_without_clearing() {
        let surface = Recording {
            size: SurfaceSize {
                width: 800.0,
                height: 1200.0,
            },
            ops: Vec::new(),
        };
        let mut a = SpriteAnimator::new(surface, 0.6, SpriteSheet::default(), 500);
        a.start(2);
        assert_eq!(
            ops(&mut a),
            vec![Op::Draw(RUN_POSES[2], Rect::new(160.0, 720.0, 80.0, 150.0))]
        );
        assert_eq!(a.state().frame, Some(2));
        assert_eq!(a.state().frame_x, 160.0);
    }

    #[test]
    fn accepted_frame_is_one_clear_then_one_blit() {
        let mut a = animator();
        for target in 0..10 {
            let before = a.state().runner_rect();
            assert!(a.draw_run_frame(target));
            let dst = Rect::new(80.0 * target as f64, 720.0, 80.0, 150.0);
            assert_eq!(
                ops(&mut a),
                vec![
                    Op::Clear(before.inflate(1.0)),
                    Op::Draw(RUN_POSES[(target % 4) as usize], dst)
                ]
            );
            assert_eq!(a.state().frame, Some(target));
            assert_eq!(a.state().frame_x, dst.x);
        }
    }

    #[test]
    fn out_of_bounds_frame_is_a_repeatable_noop() {
        let mut a = animator();
        let before = a.state().clone();
        for _ in 0..3 {
            assert!(!a.draw_run_frame(10));
            assert!(!a.draw_run_frame(-1));
        }
        assert_eq!(a.state(), &before);
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn end_to_end_800_wide() {
        let mut a = animator();
        assert!(!a.draw_run_frame(10));
        assert!(a.draw_run_frame(9));
        let draws: Vec<Op> = ops(&mut a)
            .into_iter()
            .filter(|o| matches!(o, Op::Draw(..)))
            .collect();
        assert_eq!(
            draws,
            vec![Op::Draw(RUN_POSES[1], Rect::new(720.0, 720.0, 80.0, 150.0))]
        );
    }

    #[test]
    fn poses_cycle_with_period_four() {
        let mut a = animator();
        a.draw_run_frame(0);
        ops(&mut a);
        let mut srcs = Vec::new();
        for target in 1..9 {
            a.draw_run_frame(target);
            for op in ops(&mut a) {
                if let Op::Draw(src, _) = op {
                    srcs.push(src);
                }
            }
        }
        assert_eq!(srcs[0..4], srcs[4..8]);
        assert_eq!(srcs[0..4], [RUN_POSES[1], RUN_POSES[2], RUN_POSES[3], RUN_POSES[0]]);
    }

    #[test]
    fn hit_region_bounds_are_inclusive() {
        let a = animator();
        let s = a.state();
        // frame_x 160, w 80, frame_y 720, h 150
        assert!(s.is_target(120.0, 760.0));
        assert!(s.is_target(280.0, 760.0));
        assert!(!s.is_target(119.0, 760.0));
        assert!(!s.is_target(281.0, 760.0));
        assert!(s.is_target(200.0, 570.0));
        assert!(s.is_target(200.0, 1020.0));
        assert!(!s.is_target(200.0, 569.0));
        assert!(!s.is_target(200.0, 1021.0));
    }

    #[test]
    fn drag_only_starts_on_target() {
        let mut a = animator();
        a.handle(GestureEvent::DragStart {
            start: pt(600.0, 760.0),
            current: pt(620.0, 760.0),
        });
        assert_eq!(a.state().mode, Mode::Idle);
        drag_to(&mut a, 650.0);
        assert_eq!(a.state().frame, Some(2));
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn drag_moves_runner_and_skips_unchanged_frames() {
        let mut a = animator();
        begin_drag(&mut a);
        drag_to(&mut a, 250.0);
        assert_eq!(a.state().frame, Some(3));
        assert_eq!(ops(&mut a).len(), 2);
        drag_to(&mut a, 300.0);
        assert!(ops(&mut a).is_empty());
        drag_to(&mut a, 799.0);
        assert_eq!(a.state().frame, Some(9));
        drag_to(&mut a, 850.0);
        assert_eq!(a.state().frame, Some(9));
        a.handle(GestureEvent::DragEnd { current: pt(850.0, 760.0) });
        assert_eq!(a.state().mode, Mode::Idle);
        ops(&mut a);
        drag_to(&mut a, 100.0);
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn double_tap_jumps_then_lands() {
        let mut a = animator();
        let effect = a.handle(GestureEvent::DoubleTap { at: pt(200.0, 760.0) });
        assert_eq!(effect, Some(Effect::ScheduleLanding { delay_ms: 500 }));
        assert!(!a.input_enabled());
        assert_eq!(a.state().mode, Mode::Jumping);
        let run = Rect::new(160.0, 720.0, 80.0, 150.0);
        let air = Rect::new(160.0, 420.0, 80.0, 150.0);
        assert_eq!(
            ops(&mut a),
            vec![Op::Clear(run.inflate(1.0)), Op::Draw(JUMP_POSE, air)]
        );

        a.land();
        assert!(a.input_enabled());
        assert_eq!(a.state().mode, Mode::Idle);
        assert_eq!(
            ops(&mut a),
            vec![Op::Clear(air.inflate(1.0)), Op::Draw(RUN_POSES[2], run)]
        );
    }

    #[test]
    fn double_tap_off_target_is_ignored() {
        let mut a = animator();
        assert_eq!(a.handle(GestureEvent::DoubleTap { at: pt(600.0, 100.0) }), None);
        assert!(a.input_enabled());
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn gestures_during_jump_are_ignored() {
        let mut a = animator();
        a.handle(GestureEvent::DoubleTap { at: pt(200.0, 760.0) });
        ops(&mut a);
        assert_eq!(a.handle(GestureEvent::DoubleTap { at: pt(200.0, 760.0) }), None);
        a.handle(GestureEvent::DragStart {
            start: pt(170.0, 760.0),
            current: pt(190.0, 760.0),
        });
        a.handle(GestureEvent::TransformStart { touches: pinch_touches() });
        assert_eq!(a.state().mode, Mode::Jumping);
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn land_outside_a_jump_does_nothing() {
        let mut a = animator();
        a.land();
        assert!(ops(&mut a).is_empty());
        assert_eq!(a.state().mode, Mode::Idle);
    }

    #[test]
    fn pinch_sets_origin_translates_and_resets() {
        let mut a = animator();
        a.handle(GestureEvent::TransformStart { touches: pinch_touches() });
        assert_eq!(a.state().mode, Mode::Pinching);
        // runner center (200, 795) on an 800 x 1200 surface
        assert_eq!(ops(&mut a), vec![Op::Origin(25.0, 66.25)]);

        a.handle(GestureEvent::Pinch {
            touches: pinch_touches(),
            scale: 1.5,
            center: pt(300.0, 700.0),
        });
        assert_eq!(
            ops(&mut a),
            vec![Op::Transform(ZoomTransform {
                translate_x: 100.0,
                translate_y: -95.0,
                scale: 1.5
            })]
        );

        a.handle(GestureEvent::TransformEnd { touches: pinch_touches() });
        assert_eq!(a.state().mode, Mode::Idle);
        assert_eq!(ops(&mut a), vec![Op::Transform(ZoomTransform::IDENTITY)]);
    }

    #[test]
    fn pinch_needs_a_touch_on_target() {
        let mut a = animator();
        let far = [pt(600.0, 100.0), pt(700.0, 100.0)];
        a.handle(GestureEvent::TransformStart { touches: far });
        a.handle(GestureEvent::Pinch {
            touches: far,
            scale: 2.0,
            center: pt(650.0, 100.0),
        });
        a.handle(GestureEvent::TransformEnd { touches: far });
        assert_eq!(a.state().mode, Mode::Idle);
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn pinch_wins_over_an_active_drag() {
        let mut a = animator();
        begin_drag(&mut a);
        a.handle(GestureEvent::TransformStart { touches: pinch_touches() });
        assert_eq!(a.state().mode, Mode::Pinching);
        // drag moves no longer animate the runner
        ops(&mut a);
        drag_to(&mut a, 500.0);
        assert_eq!(a.state().frame, Some(2));
        assert!(ops(&mut a).is_empty());
    }

    #[test]
    fn drag_cannot_start_while_pinching() {
        let mut a = animator();
        a.handle(GestureEvent::TransformStart { touches: pinch_touches() });
        a.handle(GestureEvent::DragStart {
            start: pt(170.0, 760.0),
            current: pt(190.0, 760.0),
        });
        assert_eq!(a.state().mode, Mode::Pinching);
        // a stray drag end does not cancel the pinch either
        a.handle(GestureEvent::DragEnd { current: pt(190.0, 760.0) });
        assert_eq!(a.state().mode, Mode::Pinching);
    }

    #[test]
    fn double_tap_while_dragging_does_not_jump() {
        let mut a = animator();
        begin_drag(&mut a);
        assert_eq!(a.handle(GestureEvent::DoubleTap { at: pt(200.0, 760.0) }), None);
        assert!(a.input_enabled());
    }
}

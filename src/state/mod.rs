pub mod animator;
pub mod gesture;

pub use animator::{Effect, SpriteAnimator, Surface};
pub use gesture::{GestureEvent, GestureRecognizer};

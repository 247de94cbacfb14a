//! Movement input: a direction vector from keys or a touch drag.

use glam::Vec2;

/// Radius of the virtual stick, in screen pixels.
pub const DRAG_RADIUS: f32 = 48.0;

/// A movement direction with length 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput(Vec2);

impl MoveInput {
    /// No movement.
    pub const NONE: MoveInput = MoveInput(Vec2::ZERO);

    /// Direction from four held keys. Opposite keys cancel and diagonals are
    /// scaled down to unit length.
    #[must_use]
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        let v = Vec2::new(axis(left, right), axis(up, down));
        if v.x != 0.0 && v.y != 0.0 {
            Self(v / std::f32::consts::SQRT_2)
        } else {
            Self(v)
        }
    }

    /// Direction of a drag from `start` to `current`, or none if they coincide.
    #[must_use]
    pub fn from_drag(start: Vec2, current: Vec2) -> Self {
        Self((current - start).normalize_or_zero())
    }

    /// Wrap an arbitrary vector, normalizing anything longer than one.
    #[must_use]
    pub fn from_vec(v: Vec2) -> Self {
        if v.length_squared() > 1.0 {
            Self(v.normalize_or_zero())
        } else {
            Self(v)
        }
    }

    /// This input, or `other` if this one is idle.
    #[must_use]
    pub fn or(self, other: MoveInput) -> Self {
        if self.is_idle() { other } else { self }
    }

    /// Whether there is no movement.
    #[must_use]
    pub fn is_idle(self) -> bool {
        self.0 == Vec2::ZERO
    }

    /// The direction vector.
    #[must_use]
    pub const fn direction(self) -> Vec2 {
        self.0
    }
}

/// A floating virtual stick. The anchor follows the finger once it moves
/// farther than [`DRAG_RADIUS`] away.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragStick {
    touch: Option<(Vec2, Vec2)>,
}

impl DragStick {
    /// Touch down at `pos`.
    pub fn press(&mut self, pos: Vec2) {
        self.touch = Some((pos, pos));
    }

    /// Finger moved to `pos`. Ignored while not pressed.
    pub fn drag(&mut self, pos: Vec2) {
        let Some((start, _)) = self.touch else {
            return;
        };
        let offset = pos - start;
        let start = if offset.length() > DRAG_RADIUS {
            pos - offset.normalize_or_zero() * DRAG_RADIUS
        } else {
            start
        };
        self.touch = Some((start, pos));
    }

    /// Touch up.
    pub fn release(&mut self) {
        self.touch = None;
    }

    /// Anchor and finger positions while pressed.
    #[must_use]
    pub const fn touch(&self) -> Option<(Vec2, Vec2)> {
        self.touch
    }

    /// Current movement input.
    #[must_use]
    pub fn input(&self) -> MoveInput {
        self.touch
            .map_or(MoveInput::NONE, |(start, current)| MoveInput::from_drag(start, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-5
    }

    #[test]
    fn test_keys() {
        assert!(MoveInput::from_keys(false, false, false, false).is_idle());
        assert!(MoveInput::from_keys(true, true, false, false).is_idle());
        assert!(close(
            MoveInput::from_keys(false, true, false, false).direction(),
            Vec2::X
        ));
        assert!(close(
            MoveInput::from_keys(false, false, true, false).direction(),
            Vec2::NEG_Y
        ));
    }

    #[test]
    fn test_diagonal_is_unit_length() {
        let d = MoveInput::from_keys(true, false, false, true).direction();
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(d.x < 0.0 && d.y > 0.0);
    }

    #[test]
    fn test_drag() {
        assert!(MoveInput::from_drag(Vec2::ONE, Vec2::ONE).is_idle());
        let d = MoveInput::from_drag(Vec2::ZERO, Vec2::new(0.0, 10.0)).direction();
        assert!(close(d, Vec2::Y));
    }

    #[test]
    fn test_or_falls_back() {
        let keys = MoveInput::from_keys(false, true, false, false);
        assert_eq!(MoveInput::NONE.or(keys), keys);
        let drag = MoveInput::from_drag(Vec2::ZERO, Vec2::NEG_X);
        assert_eq!(drag.or(keys), drag);
    }

    #[test]
    fn test_from_vec_caps_length() {
        assert!((MoveInput::from_vec(Vec2::new(3.0, 4.0)).direction().length() - 1.0).abs() < 1e-5);
        assert!(close(MoveInput::from_vec(Vec2::new(0.5, 0.0)).direction(), Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_stick_anchor_follows() {
        let mut stick = DragStick::default();
        assert!(stick.input().is_idle());
        stick.press(Vec2::ZERO);
        stick.drag(Vec2::new(100.0, 0.0));
        let (start, current) = stick.touch().unwrap();
        assert!(close(start, Vec2::new(52.0, 0.0)));
        assert!(close(current, Vec2::new(100.0, 0.0)));
        assert!(close(stick.input().direction(), Vec2::X));
        stick.release();
        assert!(stick.input().is_idle());
    }
}

use bevy::prelude::*;
use vizij_tween_core::Follow;

use crate::host::quat_from_degrees;

/// 2D render transform of a UI element, written by widget tweens.
/// Angle is in degrees.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WidgetRenderTransform {
    pub translation: Vec2,
    pub angle: f32,
    pub scale: Vec2,
    pub shear: Vec2,
}

impl Default for WidgetRenderTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            angle: 0.0,
            scale: Vec2::ONE,
            shear: Vec2::ZERO,
        }
    }
}

/// Optional render flag consulted by tweens that cull when not rendered.
/// Entities without it count as rendered.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenVisibility {
    pub rendered: bool,
}

impl Default for TweenVisibility {
    fn default() -> Self {
        Self { rendered: true }
    }
}

/// Polyline path in the owning entity's local space, used by spline tweens.
/// A closed path runs back from the last point to the first.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct SplinePath {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

impl SplinePath {
    pub fn new(points: impl Into<Vec<Vec3>>) -> Self {
        Self {
            points: points.into(),
            closed: false,
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let closing = match self.points.as_slice() {
            [first, .., last] if self.closed => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Distance along the path of control point `index`.
    pub fn distance_at_point(&self, index: usize) -> Option<f32> {
        if index >= self.points.len() {
            return None;
        }
        Some(self.segments().take(index).map(|(a, b)| a.distance(b)).sum())
    }

    /// Position and unit travel direction at `distance`, clamped to the path.
    pub fn sample(&self, distance: f32) -> Option<(Vec3, Vec3)> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some((*only, Vec3::NEG_Z)),
            _ => {
                let mut left = distance.max(0.0);
                let mut last = None;
                for (a, b) in self.segments() {
                    let segment = a.distance(b);
                    let dir = (b - a).normalize_or_zero();
                    if left <= segment {
                        let t = if segment > 0.0 { left / segment } else { 0.0 };
                        return Some((a.lerp(b, t), dir));
                    }
                    left -= segment;
                    last = Some((b, dir));
                }
                last
            }
        }
    }
}

/// A generated [`SplinePath`] placed at its reference transform.
#[derive(Bundle, Clone, Debug, Default)]
pub struct SplineBundle {
    pub path: SplinePath,
    pub transform: Transform,
    pub global_transform: GlobalTransform,
}

impl SplineBundle {
    /// Path through world-space `points`, positioned at `reference`. With
    /// `local_to_reference` the points are offsets in the reference's frame
    /// and the path turns with it.
    pub fn from_points(
        points: &[Vec3],
        reference: Transform,
        local_to_reference: bool,
        closed: bool,
    ) -> Self {
        let local = points
            .iter()
            .map(|p| {
                if local_to_reference {
                    reference.rotation * *p
                } else {
                    *p - reference.translation
                }
            })
            .collect::<Vec<_>>();
        Self::placed(local, reference, closed)
    }

    /// One control point `point_distance` along the forward axis of each
    /// rotation (pitch, yaw, roll degrees).
    pub fn from_rotations(
        rotations: &[[f32; 3]],
        point_distance: f32,
        reference: Transform,
        local_to_reference: bool,
        closed: bool,
    ) -> Self {
        let local = rotations
            .iter()
            .map(|r| {
                let mut rotation = quat_from_degrees(*r);
                if local_to_reference {
                    rotation = reference.rotation * rotation;
                }
                rotation * Vec3::NEG_Z * point_distance
            })
            .collect::<Vec<_>>();
        Self::placed(local, reference, closed)
    }

    fn placed(points: Vec<Vec3>, reference: Transform, closed: bool) -> Self {
        let transform = Transform::from_translation(reference.translation);
        Self {
            path: SplinePath::new(points).closed(closed),
            transform,
            global_transform: GlobalTransform::from(transform),
        }
    }
}

/// Per-frame follower. Stepped every frame by the plugin until removed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TweenFollower(pub Follow);

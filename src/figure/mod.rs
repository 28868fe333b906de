//! Procedurally assembled humanoid figure
//!
//! The figure is a small tree: a root group holding rigid segments (one
//! primitive + one shared material each) and sub-groups. Rest transforms are
//! fixed at build time. The only live state is the root yaw, the root idle
//! offset and a per-segment roll about the depth axis.

mod builder;
mod material;
mod shape;

pub use builder::{build, build_with, Palette};
pub use material::{Emissive, Material};
pub use shape::Shape;

use glam::{Mat4, Quat, Vec3};
use std::sync::Arc;

/// Local placement relative to the parent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Direction multiplier for mirrored motion; left swings positive
    pub const fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// What a segment is, assigned when the figure is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Head,
    Eye(Side),
    Neck,
    Torso,
    ChestPanel,
    UpperArm(Side),
    Shoulder(Side),
    Forearm(Side),
    Hand(Side),
    Elbow(Side),
    Hip,
    UpperLeg(Side),
    Knee(Side),
    LowerLeg(Side),
    Foot(Side),
}

impl Role {
    /// Side for segments that take part in the idle arm sway.
    ///
    /// Shoulders, upper arms, elbows and forearms sway; hands sit at the
    /// waist line and stay put.
    pub const fn sway_side(self) -> Option<Side> {
        match self {
            Role::Shoulder(side)
            | Role::UpperArm(side)
            | Role::Elbow(side)
            | Role::Forearm(side) => Some(side),
            _ => None,
        }
    }
}

/// Shadow participation of a segment under the key light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadows {
    pub cast: bool,
    pub receive: bool,
}

impl Shadows {
    pub const CAST_AND_RECEIVE: Self = Self {
        cast: true,
        receive: true,
    };
    pub const CAST_ONLY: Self = Self {
        cast: true,
        receive: false,
    };
}

/// A rigid visual part of the figure
#[derive(Debug, Clone)]
pub struct Segment {
    name: &'static str,
    role: Role,
    shape: Shape,
    material: Arc<Material>,
    rest: Transform,
    sway: Option<Side>,
    shadows: Shadows,
    roll: f32,
}

impl Segment {
    pub fn new(
        name: &'static str,
        role: Role,
        shape: Shape,
        material: Arc<Material>,
        rest: Transform,
    ) -> Self {
        Self {
            name,
            role,
            shape,
            material,
            rest,
            sway: role.sway_side(),
            shadows: Shadows::CAST_AND_RECEIVE,
            roll: 0.0,
        }
    }

    pub fn with_shadows(mut self, shadows: Shadows) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Rest-pose transform; never changes after construction
    pub fn rest(&self) -> &Transform {
        &self.rest
    }

    pub fn sway(&self) -> Option<Side> {
        self.sway
    }

    pub fn shadows(&self) -> Shadows {
        self.shadows
    }

    /// Live rotation about the depth (Z) axis in radians
    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn set_roll(&mut self, roll: f32) {
        self.roll = roll;
    }

    /// Rest transform with the live roll applied
    pub fn local_matrix(&self) -> Mat4 {
        let rotation = self.rest.rotation * Quat::from_rotation_z(self.roll);
        Mat4::from_scale_rotation_translation(self.rest.scale, rotation, self.rest.translation)
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Segment(Segment),
    Group(Group),
}

/// Transform-only node that owns its children
#[derive(Debug, Clone)]
pub struct Group {
    transform: Transform,
    children: Vec<Node>,
}

impl Group {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            children: Vec::new(),
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.children.push(Node::Segment(segment));
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.children.push(Node::Group(group));
        self
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Segment)) {
        for child in &self.children {
            match child {
                Node::Segment(segment) => f(segment),
                Node::Group(group) => group.visit(f),
            }
        }
    }

    fn find(&self, name: &str) -> Option<&Segment> {
        self.children.iter().find_map(|child| match child {
            Node::Segment(segment) if segment.name() == name => Some(segment),
            Node::Segment(_) => None,
            Node::Group(group) => group.find(name),
        })
    }

    fn for_each_segment_mut(&mut self, f: &mut impl FnMut(&mut Segment)) {
        for child in &mut self.children {
            match child {
                Node::Segment(segment) => f(segment),
                Node::Group(group) => group.for_each_segment_mut(f),
            }
        }
    }

    fn visit_world<'a>(&'a self, parent: Mat4, f: &mut impl FnMut(Mat4, &'a Segment)) {
        let frame = parent * self.transform.matrix();
        for child in &self.children {
            match child {
                Node::Segment(segment) => f(frame * segment.local_matrix(), segment),
                Node::Group(group) => group.visit_world(frame, f),
            }
        }
    }
}

/// Root aggregate: the segment tree plus the live root placement
#[derive(Debug, Clone)]
pub struct Figure {
    body: Group,
    yaw: f32,
    offset: Vec3,
}

impl Figure {
    pub fn new(body: Group) -> Self {
        Self {
            body,
            yaw: 0.0,
            offset: Vec3::ZERO,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Idle offset of the body relative to the yawed root
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// All segments in depth-first build order
    pub fn segments(&self) -> Vec<&Segment> {
        let mut out = Vec::new();
        self.body.visit(&mut |segment| out.push(segment));
        out
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.body.find(name)
    }

    pub fn segment_count(&self) -> usize {
        let mut count = 0;
        self.body.visit(&mut |_| count += 1);
        count
    }

    /// Visits every segment tagged for idle sway
    pub fn for_each_swaying_mut(&mut self, mut f: impl FnMut(Side, &mut Segment)) {
        self.body.for_each_segment_mut(&mut |segment| {
            if let Some(side) = segment.sway() {
                f(side, segment);
            }
        });
    }

    /// Yaw about +Y, then the idle offset
    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_translation(self.offset)
    }

    /// World matrix of every segment, in the same order as [`Figure::segments`]
    pub fn world_transforms(&self) -> Vec<(Mat4, &Segment)> {
        let mut out = Vec::with_capacity(32);
        self.for_each_world(|world, segment| out.push((world, segment)));
        out
    }

    /// Visits every segment with its world matrix without allocating
    pub fn for_each_world<'a>(&'a self, mut f: impl FnMut(Mat4, &'a Segment)) {
        self.body.visit_world(self.root_matrix(), &mut f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metal() -> Arc<Material> {
        Arc::new(Material::new("metal", 0xcccccc, 0.8, 0.2))
    }

    #[test]
    fn test_side_sign_mirrors() {
        assert_eq!(Side::Left.sign(), 1.0);
        assert_eq!(Side::Right.sign(), -1.0);
    }

    #[test]
    fn test_only_upper_limb_roles_sway() {
        assert_eq!(Role::Shoulder(Side::Left).sway_side(), Some(Side::Left));
        assert_eq!(Role::Forearm(Side::Right).sway_side(), Some(Side::Right));
        assert_eq!(Role::Hand(Side::Left).sway_side(), None);
        assert_eq!(Role::Knee(Side::Left).sway_side(), None);
        assert_eq!(Role::Hip.sway_side(), None);
    }

    #[test]
    fn test_group_world_transform_composes_parent() {
        let segment = Segment::new(
            "neck",
            Role::Neck,
            Shape::cylinder(0.3, 0.35, 0.6, 16),
            metal(),
            Transform::from_translation(Vec3::new(0.0, 2.3, 0.0)),
        );
        let mut figure = Figure::new(Group::new(Transform::IDENTITY).with_segment(segment));
        figure.set_offset(Vec3::new(0.0, 0.05, 0.0));

        let (world, seg) = figure.world_transforms()[0];
        assert_eq!(seg.name(), "neck");
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 2.35, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_yaw_rotates_about_vertical_axis() {
        let segment = Segment::new(
            "hip",
            Role::Hip,
            Shape::cuboid(1.3, 0.8, 0.6),
            metal(),
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        );
        let mut figure = Figure::new(Group::new(Transform::IDENTITY).with_segment(segment));
        figure.set_yaw(std::f32::consts::FRAC_PI_2);

        let (world, _) = figure.world_transforms()[0];
        let p = world.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_roll_leaves_rest_untouched() {
        let rest = Transform::from_translation(Vec3::new(-0.8, 1.8, 0.0));
        let mut segment = Segment::new(
            "upper_arm_left",
            Role::UpperArm(Side::Left),
            Shape::cuboid(0.35, 1.4, 0.35),
            metal(),
            rest,
        );
        segment.set_roll(0.1);
        assert_eq!(segment.rest(), &rest);
        assert_eq!(segment.roll(), 0.1);
        assert_ne!(segment.local_matrix(), rest.matrix());
    }

    #[test]
    fn test_sway_follows_role_not_position() {
        // Below the spatial rule's y > 0 band; the role still decides
        let segment = Segment::new(
            "upper_arm_left",
            Role::UpperArm(Side::Left),
            Shape::cuboid(0.35, 1.4, 0.35),
            metal(),
            Transform::from_translation(Vec3::new(-0.6, -0.5, 0.0)),
        );
        assert_eq!(segment.sway(), Some(Side::Left));

        let hand = Segment::new(
            "hand_right",
            Role::Hand(Side::Right),
            Shape::sphere(0.25, 12, 12),
            metal(),
            Transform::from_translation(Vec3::new(1.2, 1.0, 0.0)),
        );
        assert_eq!(hand.sway(), None);
    }

    #[test]
    fn test_world_visitor_matches_segment_order() {
        let figure = build();
        let mut visited = Vec::new();
        figure.for_each_world(|_, segment| visited.push(segment.name()));
        let names: Vec<_> = figure.segments().iter().map(|s| s.name()).collect();
        assert_eq!(visited, names);
        assert_eq!(figure.segment_count(), names.len());
    }

    #[test]
    fn test_segment_lookup_descends_into_groups() {
        let figure = build();
        assert_eq!(figure.segment("eye_right").map(|s| s.role()), Some(Role::Eye(Side::Right)));
        assert!(figure.segment("tail").is_none());
    }

    #[test]
    fn test_segments_cast_and_receive_by_default() {
        let segment = Segment::new(
            "hip",
            Role::Hip,
            Shape::cuboid(1.3, 0.8, 0.6),
            metal(),
            Transform::IDENTITY,
        );
        assert_eq!(segment.shadows(), Shadows::CAST_AND_RECEIVE);
        assert_eq!(segment.with_shadows(Shadows::CAST_ONLY).shadows(), Shadows::CAST_ONLY);
    }
}

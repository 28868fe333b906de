use glam::Vec3;
use std::sync::Arc;

use super::{Figure, Group, Material, Role, Segment, Shadows, Shape, Side, Transform};

/// The shared materials every segment draws from
#[derive(Debug, Clone)]
pub struct Palette {
    pub metal: Arc<Material>,
    pub dark_metal: Arc<Material>,
    pub black_plastic: Arc<Material>,
    pub gold_joint: Arc<Material>,
    pub eye: Arc<Material>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            metal: Arc::new(Material::new("metal", 0xcccccc, 0.8, 0.2)),
            dark_metal: Arc::new(Material::new("dark_metal", 0x333333, 0.9, 0.15)),
            black_plastic: Arc::new(Material::new("black_plastic", 0x1a1a1a, 0.3, 0.4)),
            gold_joint: Arc::new(Material::new("gold_joint", 0xffd700, 0.95, 0.1)),
            eye: Arc::new(Material::new("eye", 0x00ff00, 0.9, 0.1).with_emissive(0x00ff00, 0.5)),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

const HEAD: Shape = Shape::sphere(0.75, 16, 16);
const EYE: Shape = Shape::sphere(0.15, 16, 16);
const NECK: Shape = Shape::cylinder(0.3, 0.35, 0.6, 16);
const TORSO: Shape = Shape::cuboid(1.2, 2.0, 0.6);
const CHEST_PANEL: Shape = Shape::cuboid(1.0, 1.6, 0.1);
const UPPER_ARM: Shape = Shape::cuboid(0.35, 1.4, 0.35);
const SHOULDER: Shape = Shape::sphere(0.25, 12, 12);
const FOREARM: Shape = Shape::cuboid(0.3, 1.2, 0.3);
const HAND: Shape = Shape::cuboid(0.28, 0.5, 0.28);
const ELBOW: Shape = Shape::sphere(0.2, 12, 12);
const HIP: Shape = Shape::cuboid(1.3, 0.8, 0.6);
const UPPER_LEG: Shape = Shape::cuboid(0.4, 1.3, 0.4);
const KNEE: Shape = Shape::sphere(0.22, 12, 12);
const LOWER_LEG: Shape = Shape::cuboid(0.35, 1.2, 0.35);
const FOOT: Shape = Shape::cuboid(0.45, 0.35, 0.55);

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

fn part(name: &'static str, role: Role, shape: Shape, material: &Arc<Material>, rest: Transform) -> Segment {
    Segment::new(name, role, shape, Arc::clone(material), rest)
}

/// Left/right pair mirrored across the sagittal plane; `x` is the right-hand offset
fn pair(
    names: [&'static str; 2],
    role: fn(Side) -> Role,
    shape: Shape,
    material: &Arc<Material>,
    x: f32,
    y: f32,
    z: f32,
) -> [Segment; 2] {
    [
        part(names[0], role(Side::Left), shape, material, at(-x, y, z)),
        part(names[1], role(Side::Right), shape, material, at(x, y, z)),
    ]
}

fn cast_only(segments: [Segment; 2]) -> [Segment; 2] {
    segments.map(|segment| segment.with_shadows(Shadows::CAST_ONLY))
}

/// Builds the rest-pose figure with a fresh palette
pub fn build() -> Figure {
    build_with(&Palette::new())
}

/// Builds the rest-pose figure from the given shared materials
pub fn build_with(palette: &Palette) -> Figure {
    let head = Group::new(Transform::IDENTITY)
        .with_segment(part(
            "head",
            Role::Head,
            HEAD,
            &palette.metal,
            at(0.0, 2.8, 0.0).with_scale(Vec3::new(1.0, 1.25, 0.6)),
        ))
        .with_segment(
            part("eye_left", Role::Eye(Side::Left), EYE, &palette.eye, at(-0.3, 3.1, 0.5))
                .with_shadows(Shadows::CAST_ONLY),
        )
        .with_segment(
            part("eye_right", Role::Eye(Side::Right), EYE, &palette.eye, at(0.3, 3.1, 0.5))
                .with_shadows(Shadows::CAST_ONLY),
        );

    let mut body = Group::new(Transform::IDENTITY)
        .with_group(head)
        .with_segment(part("neck", Role::Neck, NECK, &palette.dark_metal, at(0.0, 2.3, 0.0)))
        .with_segment(part("torso", Role::Torso, TORSO, &palette.metal, at(0.0, 0.8, 0.0)))
        .with_segment(part(
            "chest_panel",
            Role::ChestPanel,
            CHEST_PANEL,
            &palette.dark_metal,
            at(0.0, 0.9, 0.35),
        )
        .with_shadows(Shadows::CAST_ONLY));

    let limbs = [
        pair(["upper_arm_left", "upper_arm_right"], Role::UpperArm, UPPER_ARM, &palette.metal, 0.8, 1.8, 0.0),
        cast_only(pair(["shoulder_left", "shoulder_right"], Role::Shoulder, SHOULDER, &palette.gold_joint, 0.8, 2.2, 0.0)),
        pair(["forearm_left", "forearm_right"], Role::Forearm, FOREARM, &palette.metal, 0.8, 0.6, 0.2),
        cast_only(pair(["hand_left", "hand_right"], Role::Hand, HAND, &palette.black_plastic, 0.8, 0.0, 0.3)),
        cast_only(pair(["elbow_left", "elbow_right"], Role::Elbow, ELBOW, &palette.gold_joint, 0.8, 1.2, 0.1)),
    ];
    for segment in limbs.into_iter().flatten() {
        body = body.with_segment(segment);
    }

    body = body.with_segment(part("hip", Role::Hip, HIP, &palette.metal, at(0.0, -0.7, 0.0)));

    let legs = [
        pair(["upper_leg_left", "upper_leg_right"], Role::UpperLeg, UPPER_LEG, &palette.metal, 0.4, -1.5, 0.0),
        cast_only(pair(["knee_left", "knee_right"], Role::Knee, KNEE, &palette.gold_joint, 0.4, -2.2, 0.0)),
        pair(["lower_leg_left", "lower_leg_right"], Role::LowerLeg, LOWER_LEG, &palette.metal, 0.4, -2.9, 0.0),
        pair(["foot_left", "foot_right"], Role::Foot, FOOT, &palette.dark_metal, 0.4, -3.7, 0.1),
    ];
    for segment in legs.into_iter().flatten() {
        body = body.with_segment(segment);
    }

    let figure = Figure::new(body);
    log::debug!("Figure assembled: {} segments", figure.segment_count());
    figure
}

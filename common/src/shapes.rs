use rand::Rng;
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

pub trait Shape: Debug {
    // The point a tree stores the shape by: a circle's center, a capsule's midpoint.
    fn anchor(&self) -> Vec2;

    // Largest per-axis distance from the anchor to any point of the shape.
    fn reach(&self) -> f32;

    fn translated_to(&self, anchor: Vec2) -> Self
    where
        Self: Sized;
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn distance_squared(self, other: Vec2) -> f32 {
        (self - other).length_squared()
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Vec2::new(x, y)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Shape for Circle {
    fn anchor(&self) -> Vec2 {
        self.center()
    }

    fn reach(&self) -> f32 {
        self.radius
    }

    fn translated_to(&self, anchor: Vec2) -> Self {
        Circle::new(anchor.x, anchor.y, self.radius)
    }
}

/// A segment from `a` to `b` swept by a disc of radius `thickness`.
///
/// A zero `thickness` makes it a plain segment, and `a == b` makes it a circle.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Capsule {
    pub a: Vec2,
    pub b: Vec2,
    pub thickness: f32,
}

impl Capsule {
    pub fn new(a: Vec2, b: Vec2, thickness: f32) -> Self {
        Self { a, b, thickness }
    }

    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self::new(a, b, 0.0)
    }

    pub fn midpoint(&self) -> Vec2 {
        self.a.midpoint(self.b)
    }

    pub fn is_segment(&self) -> bool {
        self.thickness == 0.0
    }
}

impl Shape for Capsule {
    fn anchor(&self) -> Vec2 {
        self.midpoint()
    }

    fn reach(&self) -> f32 {
        let mid = self.midpoint();
        let half_x = (self.a.x - mid.x).abs().max((self.b.x - mid.x).abs());
        let half_y = (self.a.y - mid.y).abs().max((self.b.y - mid.y).abs());
        half_x.max(half_y) + self.thickness
    }

    fn translated_to(&self, anchor: Vec2) -> Self {
        let offset = anchor - self.midpoint();
        Capsule::new(self.a + offset, self.b + offset, self.thickness)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    // True when the circle lies entirely inside the rectangle.
    pub fn contains_circle(&self, x: f32, y: f32, radius: f32) -> bool {
        x - radius >= self.left()
            && x + radius <= self.right()
            && y - radius >= self.top()
            && y + radius <= self.bottom()
    }

    pub fn get_random_circle_coords_inside<R: Rng>(&self, radius: f32, rng: &mut R) -> (f32, f32) {
        // Keep a one unit margin from the edges.
        let radius = radius + 1.0;
        (
            safe_randf32(rng, self.left() + radius, self.right() - radius),
            safe_randf32(rng, self.top() + radius, self.bottom() - radius),
        )
    }

    pub fn random_circle_inside<R: Rng>(&self, radius: f32, rng: &mut R) -> Circle {
        let (x, y) = self.get_random_circle_coords_inside(radius, rng);
        Circle::new(x, y, radius)
    }

    pub fn random_capsule_inside<R: Rng>(
        &self,
        max_half_length: f32,
        thickness: f32,
        rng: &mut R,
    ) -> Capsule {
        let (x, y) = self.get_random_circle_coords_inside(max_half_length + thickness, rng);
        let half_x = safe_randf32(rng, -max_half_length, max_half_length);
        let half_y = safe_randf32(rng, -max_half_length, max_half_length);
        let center = Vec2::new(x, y);
        let half = Vec2::new(half_x, half_y);
        Capsule::new(center - half, center + half, thickness)
    }
}

fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min > max {
        return min;
    }
    rng.gen_range(min..=max)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShapeEnum {
    Circle(Circle),
    Capsule(Capsule),
}

impl ShapeEnum {
    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        ShapeEnum::Circle(Circle::new(x, y, radius))
    }

    pub fn capsule(a: Vec2, b: Vec2, thickness: f32) -> Self {
        ShapeEnum::Capsule(Capsule::new(a, b, thickness))
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        ShapeEnum::Capsule(Capsule::segment(start, end))
    }
}

impl Shape for ShapeEnum {
    fn anchor(&self) -> Vec2 {
        match self {
            ShapeEnum::Circle(circle) => circle.anchor(),
            ShapeEnum::Capsule(capsule) => capsule.anchor(),
        }
    }

    fn reach(&self) -> f32 {
        match self {
            ShapeEnum::Circle(circle) => circle.reach(),
            ShapeEnum::Capsule(capsule) => capsule.reach(),
        }
    }

    fn translated_to(&self, anchor: Vec2) -> Self {
        match self {
            ShapeEnum::Circle(circle) => ShapeEnum::Circle(circle.translated_to(anchor)),
            ShapeEnum::Capsule(capsule) => ShapeEnum::Capsule(capsule.translated_to(anchor)),
        }
    }
}

impl From<Circle> for ShapeEnum {
    fn from(circle: Circle) -> Self {
        ShapeEnum::Circle(circle)
    }
}

impl From<Capsule> for ShapeEnum {
    fn from(capsule: Capsule) -> Self {
        ShapeEnum::Capsule(capsule)
    }
}

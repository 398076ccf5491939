use crate::shapes::{Capsule, Circle, ShapeEnum, Vec2};

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

// Assumes p is collinear with a-b
fn within_segment_box(p: Vec2, a: Vec2, b: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

pub fn point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    cross(a, b, p) == 0.0 && within_segment_box(p, a, b)
}

pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

pub fn point_segment_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance_squared(closest_point_on_segment(p, a, b))
}

pub fn segments_intersect(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> bool {
    let d1 = cross(p2, q2, p1);
    let d2 = cross(p2, q2, q1);
    let d3 = cross(p1, q1, p2);
    let d4 = cross(p1, q1, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_segment_box(p1, p2, q2))
        || (d2 == 0.0 && within_segment_box(q1, p2, q2))
        || (d3 == 0.0 && within_segment_box(p2, p1, q1))
        || (d4 == 0.0 && within_segment_box(q2, p1, q1))
}

/// Squared minimum distance between segments `p1-q1` and `p2-q2`.
///
/// Either segment may be degenerate (a point). Crossing segments report zero.
pub fn segment_segment_distance_sq(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> f32 {
    if segments_intersect(p1, q1, p2, q2) {
        return 0.0;
    }

    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a == 0.0 && e == 0.0 {
        return r.length_squared();
    }

    let (s, t) = if a == 0.0 {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e == 0.0 {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            // Parallel segments: any s works, start from p1
            let mut s = if denom != 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    c1.distance_squared(c2)
}

pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let distance_sq = dx * dx + dy * dy;
    let collision_distance = a.radius + b.radius;
    distance_sq <= collision_distance * collision_distance
}

pub fn circle_capsule(circle: &Circle, capsule: &Capsule) -> bool {
    let center = circle.center();
    let collision_distance = circle.radius + capsule.thickness;
    if collision_distance == 0.0 {
        return point_on_segment(center, capsule.a, capsule.b);
    }
    point_segment_distance_sq(center, capsule.a, capsule.b)
        <= collision_distance * collision_distance
}

pub fn capsule_capsule(a: &Capsule, b: &Capsule) -> bool {
    let collision_distance = a.thickness + b.thickness;
    segment_segment_distance_sq(a.a, a.b, b.a, b.b) <= collision_distance * collision_distance
}

pub fn shape_shape(a: &ShapeEnum, b: &ShapeEnum) -> bool {
    match (a, b) {
        (ShapeEnum::Circle(circle_a), ShapeEnum::Circle(circle_b)) => {
            circle_circle(circle_a, circle_b)
        }
        (ShapeEnum::Circle(circle), ShapeEnum::Capsule(capsule))
        | (ShapeEnum::Capsule(capsule), ShapeEnum::Circle(circle)) => {
            circle_capsule(circle, capsule)
        }
        (ShapeEnum::Capsule(capsule_a), ShapeEnum::Capsule(capsule_b)) => {
            capsule_capsule(capsule_a, capsule_b)
        }
    }
}

// Core distance (center or spine) and the radius both shapes add on top of it
fn core_distance_sq(a: &ShapeEnum, b: &ShapeEnum) -> (f32, f32) {
    match (a, b) {
        (ShapeEnum::Circle(circle_a), ShapeEnum::Circle(circle_b)) => (
            circle_a.center().distance_squared(circle_b.center()),
            circle_a.radius + circle_b.radius,
        ),
        (ShapeEnum::Circle(circle), ShapeEnum::Capsule(capsule))
        | (ShapeEnum::Capsule(capsule), ShapeEnum::Circle(circle)) => (
            point_segment_distance_sq(circle.center(), capsule.a, capsule.b),
            circle.radius + capsule.thickness,
        ),
        (ShapeEnum::Capsule(capsule_a), ShapeEnum::Capsule(capsule_b)) => (
            segment_segment_distance_sq(capsule_a.a, capsule_a.b, capsule_b.a, capsule_b.b),
            capsule_a.thickness + capsule_b.thickness,
        ),
    }
}

/// Gap between the surfaces of two shapes, zero when they touch or overlap.
pub fn shape_distance(a: &ShapeEnum, b: &ShapeEnum) -> f32 {
    let (distance_sq, radii) = core_distance_sq(a, b);
    (distance_sq.sqrt() - radii).max(0.0)
}

// Overlap test that also accepts shapes separated by at most `epsilon`
pub fn shapes_within(a: &ShapeEnum, b: &ShapeEnum, epsilon: f32) -> bool {
    if shape_shape(a, b) {
        return true;
    }
    let (distance_sq, radii) = core_distance_sq(a, b);
    let reach = radii + epsilon.max(0.0);
    distance_sq <= reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn circles_touching_count_as_overlap() {
        let a = Circle::new(0.0, 0.0, 1.0);
        let b = Circle::new(2.0, 0.0, 1.0);
        assert!(circle_circle(&a, &b));
        let c = Circle::new(2.5, 0.0, 1.0);
        assert!(!circle_circle(&a, &c));
    }

    #[test]
    fn zero_radius_circles_are_points() {
        let p = Circle::new(1.0, 1.0, 0.0);
        assert!(circle_circle(&p, &p));
        assert!(circle_circle(&p, &Circle::new(0.0, 1.0, 1.0)));
        assert!(!circle_circle(&p, &Circle::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let a = v(0.0, 0.0);
        let b = v(10.0, 0.0);
        assert_eq!(closest_point_on_segment(v(-5.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(v(15.0, -3.0), a, b), b);
        assert_eq!(closest_point_on_segment(v(4.0, 7.0), a, b), v(4.0, 0.0));
        assert_eq!(closest_point_on_segment(v(4.0, 7.0), a, a), a);
    }

    #[test]
    fn circle_against_capsule_uses_spine_distance() {
        let capsule = Capsule::new(v(0.0, 0.0), v(10.0, 0.0), 1.0);
        assert!(circle_capsule(&Circle::new(5.0, 2.0, 1.0), &capsule));
        assert!(!circle_capsule(&Circle::new(5.0, 2.5, 1.0), &capsule));
        // Past the rounded end cap
        assert!(circle_capsule(&Circle::new(12.0, 0.0, 1.0), &capsule));
        assert!(!circle_capsule(&Circle::new(11.5, 1.5, 1.0), &capsule));
    }

    #[test]
    fn point_on_line_is_a_hit() {
        let line = Capsule::segment(v(0.0, 0.0), v(4.0, 4.0));
        assert!(circle_capsule(&Circle::new(2.0, 2.0, 0.0), &line));
        assert!(!circle_capsule(&Circle::new(2.0, 2.5, 0.0), &line));
        assert!(!circle_capsule(&Circle::new(5.0, 5.0, 0.0), &line));
    }

    #[test]
    fn crossing_lines_intersect() {
        let a = Capsule::segment(v(0.0, 0.0), v(2.0, 2.0));
        let b = Capsule::segment(v(0.0, 2.0), v(2.0, 0.0));
        assert!(capsule_capsule(&a, &b));
        let c = Capsule::segment(v(3.0, 0.0), v(3.0, 5.0));
        assert!(!capsule_capsule(&a, &c));
    }

    #[test]
    fn collinear_segments() {
        let a = v(0.0, 0.0);
        let b = v(4.0, 0.0);
        assert!(segments_intersect(a, b, v(4.0, 0.0), v(6.0, 0.0)));
        assert!(!segments_intersect(a, b, v(5.0, 0.0), v(6.0, 0.0)));
        assert_eq!(segment_segment_distance_sq(a, b, v(5.0, 0.0), v(6.0, 0.0)), 1.0);
    }

    #[test]
    fn parallel_segments_distance() {
        let d = segment_segment_distance_sq(v(0.0, 0.0), v(4.0, 0.0), v(1.0, 3.0), v(3.0, 3.0));
        assert_eq!(d, 9.0);
        let capsule_a = Capsule::new(v(0.0, 0.0), v(4.0, 0.0), 1.5);
        let capsule_b = Capsule::new(v(1.0, 3.0), v(3.0, 3.0), 1.5);
        assert!(capsule_capsule(&capsule_a, &capsule_b));
    }

    #[test]
    fn degenerate_capsules_are_circles() {
        let dot = Capsule::new(v(1.0, 1.0), v(1.0, 1.0), 1.0);
        let other = Capsule::new(v(3.0, 1.0), v(3.0, 1.0), 1.0);
        assert!(capsule_capsule(&dot, &other));
        assert_eq!(segment_segment_distance_sq(dot.a, dot.b, v(1.0, 4.0), v(5.0, 4.0)), 9.0);
    }

    #[test]
    fn distance_and_tolerance() {
        let a = ShapeEnum::circle(0.0, 0.0, 1.0);
        let b = ShapeEnum::circle(3.0, 0.0, 1.0);
        assert_eq!(shape_distance(&a, &b), 1.0);
        assert!(!shape_shape(&a, &b));
        assert!(!shapes_within(&a, &b, 0.5));
        assert!(shapes_within(&a, &b, 1.0));
        let line = ShapeEnum::line(v(-5.0, 1.0), v(5.0, 1.0));
        assert_eq!(shape_distance(&a, &line), 0.0);
    }
}

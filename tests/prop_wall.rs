use proptest::prelude::*;
use tilelight::{Direction, FaceAxis, Point, Rect, Wall};

fn arb_face_axis() -> impl Strategy<Value = FaceAxis> {
    prop_oneof![Just(FaceAxis::Horizontal), Just(FaceAxis::Vertical)]
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Inward), Just(Direction::Outward)]
}

/// Axis-aligned wall with integer endpoints; the segment runs across its face axis
fn arb_wall() -> impl Strategy<Value = Wall> {
    (-400i32..400, -400i32..400, 1i32..200, arb_face_axis(), arb_direction()).prop_map(
        |(x, y, len, axis, dir)| {
            let p1 = Point::new(x as f32, y as f32);
            let p2 = match axis {
                FaceAxis::Horizontal => Point::new(x as f32, (y + len) as f32),
                FaceAxis::Vertical => Point::new((x + len) as f32, y as f32),
            };
            Wall::new(p1, p2, axis, dir)
        },
    )
}

fn arb_point() -> impl Strategy<Value = Point> {
    (-500i32..500, -500i32..500).prop_map(|(x, y)| Point::new(x as f32, y as f32))
}

fn bounds() -> Rect {
    Rect::new(-600.0, -600.0, 1200.0, 1200.0)
}

proptest! {
    // A source off the face line casts from exactly one of the two sides
    #[test]
    fn check_cast_is_one_sided(wall in arb_wall(), src in arb_point()) {
        let axis = wall.face_axis().index();
        let line = wall.p1().axis(axis);
        prop_assume!(src.axis(axis) != line);

        let mirrored = if axis == 0 {
            Point::new(2.0 * line - src.x, src.y)
        } else {
            Point::new(src.x, 2.0 * line - src.y)
        };
        prop_assert_ne!(wall.check_cast(src), wall.check_cast(mirrored));
    }

    // Sources on the face line never cast
    #[test]
    fn check_cast_false_on_face_line(wall in arb_wall(), t in -500i32..500) {
        let src = match wall.face_axis() {
            FaceAxis::Horizontal => Point::new(wall.p1().x, t as f32),
            FaceAxis::Vertical => Point::new(t as f32, wall.p1().y),
        };
        prop_assert!(!wall.check_cast(src));
    }

    #[test]
    fn clone_move_round_trips(wall in arb_wall(), dx in -1000i32..1000, dy in -1000i32..1000) {
        let off = Point::new(dx as f32, dy as f32);
        let back = wall.clone_move(off).clone_move(-off);
        prop_assert_eq!(back, wall);
    }

    #[test]
    fn clone_move_shifts_bounding_rect(wall in arb_wall(), dx in -1000i32..1000, dy in -1000i32..1000) {
        let off = Point::new(dx as f32, dy as f32);
        prop_assert_eq!(wall.clone_move(off).rect(), wall.rect().translate(off));
    }

    // Polygon starts and ends on the wall, with at most two corners between casts
    #[test]
    fn shadow_polygon_anchored_on_wall(wall in arb_wall(), src in arb_point()) {
        let poly = wall.shadow_polygon(src, &bounds());
        prop_assert_eq!(poly.is_some(), wall.check_cast(src));
        if let Some(poly) = poly {
            prop_assert!(poly.len() >= 4 && poly.len() <= 6);
            prop_assert_eq!(poly[0], wall.p1());
            prop_assert_eq!(poly[poly.len() - 1], wall.p2());
        }
    }

    // Cast points land on the boundary of the bounds
    #[test]
    fn cast_endpoint_on_boundary(src in arb_point(), end in arb_point()) {
        prop_assume!(src != end);
        let b = bounds();
        let (p, _side) = Wall::determine_cast_endpoint(src, end, &b);
        let on_x = (p.x - b.left()).abs() < 1e-2 || (p.x - b.right()).abs() < 1e-2;
        let on_y = (p.y - b.top()).abs() < 1e-2 || (p.y - b.bottom()).abs() < 1e-2;
        prop_assert!(on_x || on_y, "{:?} not on the edge", p);
    }
}

#[test]
fn shadow_polygon_example_from_above() {
    let wall = Wall::new(
        Point::new(40.0, 40.0),
        Point::new(60.0, 40.0),
        FaceAxis::Vertical,
        Direction::Outward,
    );
    let poly = wall
        .shadow_polygon(Point::new(50.0, 10.0), &Rect::new(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    assert_eq!(poly.first(), Some(&Point::new(40.0, 40.0)));
    assert_eq!(poly.last(), Some(&Point::new(60.0, 40.0)));
}

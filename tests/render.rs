use tilelight::{
    BlendMode, Direction, FaceAxis, Light, LightBox, LightBoxConfig, LightingError, PixelBuffer,
    Point, Wall,
};

fn template() -> PixelBuffer {
    let mut img = PixelBuffer::with_size(8, 8);
    img.clear_rgba(255, 255, 255, 255);
    img
}

fn floor_wall(x0: f32, x1: f32, y: f32) -> Wall {
    Wall::new(
        Point::new(x0, y),
        Point::new(x1, y),
        FaceAxis::Vertical,
        Direction::Outward,
    )
}

fn scene() -> LightBox {
    let mut light_box = LightBox::new(LightBoxConfig::new(200, 200));
    let light = Light::new(Point::new(100.0, 100.0), 50, &template(), (255, 255, 255), 255)
        .with_seed(5);
    light_box.add_light(light);
    light_box
}

#[test]
fn far_wall_is_not_visible() {
    let mut light_box = scene();
    light_box.add_walls([floor_wall(80.0, 120.0, 130.0), floor_wall(2000.0, 2040.0, 2000.0)]);

    let mut target = PixelBuffer::with_size(200, 200);
    let visible = light_box.render(&mut target, Point::ZERO);

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].p1(), Point::new(80.0, 130.0));
}

#[test]
fn wall_in_queried_chunk_but_outside_render_box_is_culled() {
    let mut light_box = scene();
    // chunk 3 is inside the overshoot range, x = 300 is past the box edge at 250
    light_box.add_walls([floor_wall(300.0, 320.0, 100.0)]);
    assert!(light_box.visible_walls(Point::ZERO).is_empty());
}

#[test]
fn visible_walls_match_render_result() {
    let mut light_box = scene();
    light_box.add_walls([floor_wall(80.0, 120.0, 130.0), floor_wall(240.0, 245.0, 10.0)]);
    let offset = Point::new(30.0, -20.0);

    let expected = light_box.visible_walls(offset);
    let mut target = PixelBuffer::with_size(200, 200);
    target.clear_rgba(0, 0, 0, 255);
    assert_eq!(light_box.render(&mut target, offset), expected);
    assert_eq!(expected.len(), 2);
    assert_eq!(expected[0].p1(), Point::new(50.0, 150.0));

    // light sits at local (70, 120), the wall at local y = 150
    assert_eq!(target.get_pixel_rgba(70, 140), Some((255, 255, 255, 255)));
    assert_eq!(target.get_pixel_rgba(70, 165), Some((0, 0, 0, 255)));
}

#[test]
fn fractional_offset_floors_light_corner() {
    let mut light_box = scene();
    light_box.add_walls([floor_wall(80.0, 120.0, 130.0)]);

    // source lands at local (-0.5, 120.5), so the square starts at x = -51
    let mut target = PixelBuffer::with_size(200, 200);
    target.clear_rgba(0, 0, 0, 255);
    light_box.render(&mut target, Point::new(100.5, -20.5));

    assert_eq!(target.get_pixel_rgba(48, 100), Some((255, 255, 255, 255)));
    assert_eq!(target.get_pixel_rgba(49, 100), Some((0, 0, 0, 255)));
    assert_eq!(target.get_pixel_rgba(0, 140), Some((255, 255, 255, 255)));
    assert_eq!(target.get_pixel_rgba(0, 165), Some((0, 0, 0, 255)));
}

#[test]
fn dynamic_group_follows_edits_and_deletion() {
    let mut light_box = scene();
    let group = light_box.add_dynamic_walls(vec![floor_wall(90.0, 110.0, 120.0)]);
    assert_eq!(light_box.visible_walls(Point::ZERO).len(), 1);

    light_box
        .update_dynamic_walls(group, vec![floor_wall(90.0, 110.0, 120.0), floor_wall(0.0, 5.0, 5.0)])
        .unwrap();
    assert_eq!(light_box.visible_walls(Point::ZERO).len(), 2);

    light_box.delete_dynamic_walls(group).unwrap();
    assert!(light_box.visible_walls(Point::ZERO).is_empty());
    assert!(matches!(
        light_box.dynamic_walls(group),
        Err(LightingError::WallGroupNotFound(id)) if id == group
    ));
}

#[test]
fn shadow_darkens_behind_wall_only() {
    let mut light_box = scene();
    light_box.add_walls([floor_wall(80.0, 120.0, 120.0)]);

    let mut target = PixelBuffer::with_size(200, 200);
    target.clear_rgba(0, 0, 0, 255);
    light_box.render(&mut target, Point::ZERO);

    assert_eq!(target.get_pixel_rgba(100, 110), Some((255, 255, 255, 255)));
    assert_eq!(target.get_pixel_rgba(100, 140), Some((0, 0, 0, 255)));
    // outside the light's square
    assert_eq!(target.get_pixel_rgba(10, 10), Some((0, 0, 0, 255)));
}

#[test]
fn lights_accumulate_additively() {
    let mut light_box = LightBox::new(LightBoxConfig::new(50, 50));
    for _ in 0..2 {
        let light = Light::new(Point::new(25.0, 25.0), 10, &template(), (100, 0, 0), 255);
        light_box.add_light(light);
    }

    let mut target = PixelBuffer::with_size(50, 50);
    light_box.render(&mut target, Point::ZERO);
    let (r, g, _, _) = target.get_pixel_rgba(25, 25).unwrap();
    assert_eq!(g, 0);
    assert!((198..=202).contains(&r), "r = {}", r);
}

#[test]
fn removed_light_no_longer_renders() {
    let mut light_box = scene();
    let id = light_box.lights().next().map(|(id, _)| id).unwrap();
    light_box.remove_light(id).unwrap();
    assert_eq!(light_box.light_count(), 0);
    assert!(matches!(light_box.get_light(id), Err(LightingError::LightNotFound(_))));

    let mut target = PixelBuffer::with_size(200, 200);
    light_box.render(&mut target, Point::ZERO);
    assert_eq!(target.get_pixel_rgba(100, 100), Some((0, 0, 0, 255)));
}

#[test]
fn multiply_mode_from_config() {
    let config = LightBoxConfig::new(200, 200).with_blend_mode(BlendMode::Multiply);
    let mut light_box = LightBox::new(config);
    assert_eq!(light_box.blend_mode(), BlendMode::Multiply);
    light_box.set_blend_mode(BlendMode::Add);
    assert_eq!(light_box.blend_mode(), BlendMode::Add);
}

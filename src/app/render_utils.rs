use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};
use physics_charts::sim::CameraTransform;

/// Screen y grows downward, world y grows upward.
pub(super) fn world_to_screen(
    rect: Rect,
    camera: CameraTransform,
    view_offset: Vec2,
    world: Pos2,
) -> Pos2 {
    let scale = camera.scale.max(f32::EPSILON);
    pos2(
        rect.center().x + (world.x - camera.position.x) / scale + view_offset.x,
        rect.center().y - (world.y - camera.position.y) / scale + view_offset.y,
    )
}

pub(super) fn screen_to_world(
    rect: Rect,
    camera: CameraTransform,
    view_offset: Vec2,
    screen: Pos2,
) -> Pos2 {
    let scale = camera.scale.max(f32::EPSILON);
    pos2(
        camera.position.x + (screen.x - rect.center().x - view_offset.x) * scale,
        camera.position.y - (screen.y - rect.center().y - view_offset.y) * scale,
    )
}

/// Flat fill plus a light grid that follows the camera.
pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    fill: Color32,
    camera: CameraTransform,
    view_offset: Vec2,
) {
    painter.rect_filled(rect, 0.0, fill);

    let zoom = 1.0 / camera.scale.max(f32::EPSILON);
    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = world_to_screen(rect, camera, view_offset, Pos2::ZERO);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 40));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn world_rect_to_screen(
    rect: Rect,
    camera: CameraTransform,
    view_offset: Vec2,
    world: Rect,
) -> Rect {
    Rect::from_two_pos(
        world_to_screen(rect, camera, view_offset, world.min),
        world_to_screen(rect, camera, view_offset, world.max),
    )
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn camera_position_lands_in_the_middle() {
        let camera = CameraTransform {
            position: pos2(1000.0, 300.0),
            scale: 2.0,
        };
        let screen = world_to_screen(canvas(), camera, Vec2::ZERO, camera.position);
        assert_eq!(screen, pos2(400.0, 300.0));

        let above = world_to_screen(canvas(), camera, Vec2::ZERO, pos2(1000.0, 500.0));
        assert_eq!(above, pos2(400.0, 200.0));
    }

    #[test]
    fn screen_and_world_mappings_agree() {
        let camera = CameraTransform {
            position: pos2(250.0, -40.0),
            scale: 0.5,
        };
        let offset = vec2(12.0, -30.0);
        let world = pos2(310.0, 75.0);
        let back = screen_to_world(
            canvas(),
            camera,
            offset,
            world_to_screen(canvas(), camera, offset, world),
        );
        approx::assert_relative_eq!(back.x, world.x, epsilon = 1e-3);
        approx::assert_relative_eq!(back.y, world.y, epsilon = 1e-3);
    }
}

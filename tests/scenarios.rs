use eframe::egui::{Pos2, pos2};
use physics_charts::build::{BodyKind, JoinStyle, ShapeKind};
use physics_charts::data::{BUNDLED_DATASET, DataRepository};
use physics_charts::engine::{HostEngine, Scene};
use physics_charts::gesture::{GestureEvent, TouchEvent};
use physics_charts::session::{InputEvent, Session};
use physics_charts::sim::{InteractionMode, SimulationState};

fn bundled_session() -> Session<Scene> {
    let mut repository = DataRepository::new();
    repository
        .load_str(BUNDLED_DATASET)
        .expect("bundled records parse");

    let mut state = SimulationState::default();
    state.set_screen_size(428.0, 926.0);
    let scene = Scene::new(state.world_side());
    Session::new(scene, repository.into_dataset(), state, Some(42))
}

fn tap(session: &mut Session<Scene>, point: Pos2) {
    session.dispatch(InputEvent::Touch(TouchEvent::Began(point)));
    session.dispatch(InputEvent::Touch(TouchEvent::Ended(point)));
}

#[test]
fn bundled_rows_keep_the_population_split() {
    let session = bundled_session();
    let share = session.dataset().outcome_share(1.0);
    assert!((0.3..0.4).contains(&share), "positive share {share}");
}

#[test]
fn a_row_is_a_chain_of_ten_bodies_with_sliding_ends() {
    let mut session = bundled_session();
    session.state_mut().join_style = JoinStyle::Spring;

    let row = session.render_row(pos2(1700.0, 800.0)).expect("bundled rows");
    assert_eq!(row.bodies.len(), 10);
    assert_eq!(row.joints.len(), 9);
    assert_eq!(row.joints[0].style, JoinStyle::Sliding);
    assert_eq!(row.joints[8].style, JoinStyle::Sliding);
    assert!(
        row.joints[1..8]
            .iter()
            .all(|joint| joint.style == JoinStyle::Spring)
    );
    assert_eq!(session.engine().joints().len(), 9);
    assert_eq!(session.state().node_count, 10);
    assert_eq!(session.state().last_node, row.outcome_body());
}

#[test]
fn shape_rows_use_boxes() {
    let mut session = bundled_session();
    session.state_mut().row_bodies = physics_charts::render::RowBodies::Shapes;

    let row = session.render_row(pos2(1700.0, 800.0)).expect("bundled rows");
    for id in row.bodies {
        assert_eq!(session.engine().body_kind(id), Some(BodyKind::Rectangle));
    }
}

#[test]
fn chart_bars_sit_either_side_of_the_drop() {
    let mut session = bundled_session();
    let bars = session.render_chart(pos2(1000.0, 400.0));

    let negative = session.engine().body_position(bars.negative).expect("placed");
    let positive = session.engine().body_position(bars.positive).expect("placed");
    approx::assert_relative_eq!(negative.x, 962.5);
    approx::assert_relative_eq!(positive.x, 1037.5);
    assert_eq!(session.engine().body_kind(bars.positive), Some(BodyKind::ChartBar));
    assert_eq!(session.state().last_node, Some(bars.positive));
}

#[test]
fn weightless_bodies_still_settle_on_the_floor() {
    let mut session = bundled_session();
    session.state_mut().density = 0.0;
    let id = session.drop_body(pos2(1000.0, 300.0)).expect("rectangles build");

    for _ in 0..240 {
        session.step(1.0 / 60.0);
    }
    let position = session.engine().body_position(id).expect("still in scene");
    assert!(position.y < 300.0);
    assert!(position.y >= 0.0);
}

#[test]
fn cancelled_pinch_restores_the_camera() {
    let mut session = bundled_session();
    session.dispatch(InputEvent::Pinch(GestureEvent::Began));
    session.dispatch(InputEvent::Pinch(GestureEvent::Changed(4.0)));
    approx::assert_relative_eq!(session.state().camera.scale, 0.25);

    session.dispatch(InputEvent::Pinch(GestureEvent::Cancelled));
    approx::assert_relative_eq!(session.state().camera.scale, 1.0);
    assert_eq!(session.state().mode(), InteractionMode::Idle);
}

#[test]
fn camera_gesture_swallows_taps() {
    let mut session = bundled_session();
    session.state_mut().selected_shape = ShapeKind::Glyph;

    session.dispatch(InputEvent::CameraPan(GestureEvent::Began));
    tap(&mut session, pos2(900.0, 900.0));
    assert_eq!(session.engine().body_count(), 0);

    session.dispatch(InputEvent::CameraPan(GestureEvent::Cancelled));
    tap(&mut session, pos2(900.0, 900.0));
    assert_eq!(session.engine().body_count(), 1);
    assert_eq!(session.state().node_count, 1);
}

#[test]
fn removing_a_row_body_drops_its_joints() {
    let mut session = bundled_session();
    let row = session.render_row(pos2(1700.0, 800.0)).expect("bundled rows");

    assert!(session.remove_body(row.bodies[4]));
    assert_eq!(session.engine().body_count(), 9);
    assert_eq!(session.engine().joints().len(), 7);
    assert!(!session.remove_body(row.bodies[4]));
}

//! Camera, virtual canvas and touch handling through scene updates

use std::cell::RefCell;
use std::rc::Rc;

use actor_engine::prelude::*;
use approx::assert_relative_eq;

fn frame(width: f32, height: f32) -> FrameContext {
    FrameContext {
        design_size: Vec2::new(width, height),
        ..FrameContext::default()
    }
}

#[test]
fn test_snap_follow_clamps_to_scene_centre() {
    let mut scene = Scene::new("camera");
    scene.extents = Rect::new(0.0, 0.0, 800.0, 600.0);
    scene.camera.clip = true;
    let target = scene.add_actor(Actor::new("target").with_position(5000.0, 5000.0));
    scene.camera.follow(target);

    scene.update(0.016, &frame(800.0, 600.0));
    assert_relative_eq!(scene.camera.position.x, 400.0);
    assert_relative_eq!(scene.camera.position.y, 300.0);
}

#[test]
fn test_camera_coasts_and_damps_without_target() {
    let mut scene = Scene::new("camera");
    scene.camera.velocity = Vec2::new(100.0, 0.0);
    scene.camera.damping = Vec2::new(0.5, 1.0);

    let frame = frame(800.0, 600.0);
    scene.update(0.1, &frame);
    assert_relative_eq!(scene.camera.position.x, 10.0);
    scene.update(0.1, &frame);
    assert_relative_eq!(scene.camera.position.x, 15.0);
    assert_relative_eq!(scene.camera.velocity.x, 25.0);
}

#[test]
fn test_canvas_momentum_decays_and_moves_children() {
    let mut scene = Scene::new("canvas");
    let mut canvas = VirtualCanvas::new(Rect::new(-1000.0, -1000.0, 2000.0, 2000.0));
    canvas.scroll_velocity = Vec2::new(10.0, 0.0);
    let list = scene.add_actor(Actor::new("list").with_size(200.0, 200.0).with_canvas(canvas));
    let item = scene.add_child(list, Actor::new("item").with_size(10.0, 10.0)).unwrap();

    let frame = frame(800.0, 600.0);
    scene.update(0.1, &frame);
    assert_relative_eq!(scene.actor(item).unwrap().x(), 1.0, epsilon = 1e-5);
    let velocity = scene.actor(list).unwrap().canvas.as_ref().unwrap().scroll_velocity.x;
    assert_relative_eq!(velocity, 9.0, epsilon = 1e-5);

    for _ in 0..40 {
        scene.update(0.1, &frame);
    }
    let canvas = scene.actor(list).unwrap().canvas.as_ref().unwrap();
    assert_eq!(canvas.scroll_velocity.x, 0.0);
    assert_relative_eq!(scene.actor(item).unwrap().x(), canvas.scroll_pos.x, epsilon = 1e-3);
}

#[test]
fn test_canvas_culls_children_outside_its_area() {
    let mut scene = Scene::new("canvas");
    let mut canvas = VirtualCanvas::new(Rect::new(-1000.0, 0.0, 2000.0, 0.0));
    canvas.scroll_velocity = Vec2::new(-2000.0, 0.0);
    let list = scene.add_actor(Actor::new("list").with_size(100.0, 100.0).with_canvas(canvas));
    let item = scene.add_child(list, Actor::new("item").with_size(10.0, 10.0)).unwrap();

    scene.update(0.1, &frame(800.0, 600.0));
    let actor = scene.actor(item).unwrap();
    assert_relative_eq!(actor.x(), -200.0, epsilon = 1e-3);
    assert!(!actor.in_view);
}

#[test]
fn test_hit_test_prefers_children_and_skips_untouchable() {
    let mut scene = Scene::new("hits");
    let panel = scene.add_actor(Actor::new("panel").with_position(100.0, 100.0).with_size(200.0, 200.0).touchable());
    let button = scene
        .add_child(panel, Actor::new("button").with_position(20.0, 0.0).with_size(40.0, 40.0).touchable())
        .unwrap();
    let hidden = scene
        .add_child(panel, Actor::new("label").with_position(-50.0, 0.0).with_size(40.0, 40.0))
        .unwrap();

    assert_eq!(scene.hit_test(Vec2::new(125.0, 105.0)), Some(button));
    assert_eq!(scene.hit_test(Vec2::new(50.0, 100.0)), Some(panel));
    assert_ne!(scene.hit_test(Vec2::new(50.0, 100.0)), Some(hidden));
    assert_eq!(scene.hit_test(Vec2::new(500.0, 500.0)), None);

    scene.actor_mut(panel).unwrap().touchable = false;
    assert_eq!(scene.hit_test(Vec2::new(125.0, 105.0)), None);
}

#[test]
fn test_hit_test_follows_camera() {
    let mut scene = Scene::new("hits");
    let world = scene.add_actor(Actor::new("world").with_position(500.0, 100.0).with_size(20.0, 20.0).touchable());
    let mut hud = Actor::new("hud").with_position(500.0, 100.0).with_size(20.0, 20.0).touchable();
    hud.ignore_camera = true;
    hud.set_layer(1);
    let hud = scene.add_actor(hud);
    scene.camera.position = Vec2::new(400.0, 0.0);

    assert_eq!(scene.hit_test(Vec2::new(100.0, 100.0)), Some(world));
    assert_eq!(scene.hit_test(Vec2::new(500.0, 100.0)), Some(hud));
}

#[test]
fn test_tap_on_canvas_item_scrolls_and_taps() {
    let mut scene = Scene::new("touch");
    let canvas = VirtualCanvas::new(Rect::new(-500.0, -500.0, 1000.0, 1000.0));
    let list = scene.add_actor(
        Actor::new("list")
            .with_position(100.0, 100.0)
            .with_size(200.0, 200.0)
            .with_canvas(canvas)
            .touchable(),
    );
    let item = scene
        .add_child(list, Actor::new("item").with_size(50.0, 50.0).touchable())
        .unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let actor = scene.actor_mut(item).unwrap();
        let log = Rc::clone(&events);
        actor.on_begin_touch = Some(Box::new(move |_: &mut Scene, _: ActorId, _: Vec2| log.borrow_mut().push("begin")));
        let log = Rc::clone(&events);
        actor.on_move_touch = Some(Box::new(move |_: &mut Scene, _: ActorId, _: Vec2| log.borrow_mut().push("move")));
        let log = Rc::clone(&events);
        actor.on_end_touch = Some(Box::new(move |_: &mut Scene, _: ActorId, _: Vec2| log.borrow_mut().push("end")));
        let log = Rc::clone(&events);
        actor.on_tapped = Some(Box::new(move |_: &mut Scene, _: ActorId, _: Vec2| log.borrow_mut().push("tapped")));
    }

    assert_eq!(scene.touch_begin(Vec2::new(100.0, 100.0)), Some(item));
    assert!(scene.actor(list).unwrap().canvas.as_ref().unwrap().is_touching());

    scene.touch_move(Vec2::new(100.0, 110.0));
    let list_actor = scene.actor(list).unwrap();
    assert_relative_eq!(list_actor.canvas.as_ref().unwrap().scroll_pos.y, 10.0);
    assert_relative_eq!(scene.actor(item).unwrap().y(), 10.0);

    scene.touch_end();
    assert_eq!(*events.borrow(), vec!["begin", "move", "end", "tapped"]);
    assert!(!scene.actor(list).unwrap().canvas.as_ref().unwrap().is_touching());
}

#[test]
fn test_touch_released_elsewhere_is_not_a_tap() {
    let mut scene = Scene::new("touch");
    let button = scene.add_actor(Actor::new("button").with_position(50.0, 50.0).with_size(20.0, 20.0).touchable());
    let tapped = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&tapped);
    scene.actor_mut(button).unwrap().on_tapped = Some(Box::new(move |_: &mut Scene, _: ActorId, _: Vec2| {
        *flag.borrow_mut() = true;
    }));

    scene.touch_begin(Vec2::new(50.0, 50.0));
    scene.touch_move(Vec2::new(300.0, 300.0));
    scene.touch_end();
    assert!(!*tapped.borrow());
}

#[test]
fn test_touch_pans_camera_and_flicks() {
    let mut scene = Scene::new("pan");
    scene.camera.touch_pan = [true, false];
    scene.update(0.1, &frame(800.0, 600.0));

    assert_eq!(scene.touch_begin(Vec2::new(200.0, 200.0)), None);
    assert!(scene.camera.is_panning());
    scene.touch_move(Vec2::new(230.0, 205.0));
    assert_relative_eq!(scene.camera.position.x, -30.0);
    assert_relative_eq!(scene.camera.position.y, 0.0);

    scene.touch_end();
    assert!(!scene.camera.is_panning());
    assert_relative_eq!(scene.camera.velocity.x, -300.0, epsilon = 1e-3);
    assert_relative_eq!(scene.camera.velocity.y, 0.0);
}

#[test]
fn test_screen_docking_uses_design_size() {
    let mut scene = Scene::new("dock");
    let mut badge = Actor::new("badge").with_size(20.0, 20.0);
    badge.dock = Docking {
        x: DockX::Right,
        y: DockY::Bottom,
        margin: [0.0, 5.0, 0.0, 0.0],
        screen: true,
    };
    let badge = scene.add_actor(badge);

    scene.update(0.016, &frame(800.0, 600.0));
    let position = scene.actor(badge).unwrap().position();
    assert_relative_eq!(position.x, 385.0);
    assert_relative_eq!(position.y, 290.0);
}

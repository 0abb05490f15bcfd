//! Scene graph behaviour across whole frames

use std::cell::RefCell;
use std::rc::Rc;

use actor_engine::prelude::*;
use approx::assert_relative_eq;

fn frame() -> FrameContext {
    FrameContext::default()
}

#[test]
fn test_update_transform_is_idempotent() {
    let mut scene = Scene::new("graph");
    let root = scene.add_actor(
        Actor::new("root")
            .with_position(100.0, 50.0)
            .with_rotation(0.3)
            .with_scale(2.0, 0.5),
    );
    let child = scene
        .add_child(root, Actor::new("child").with_position(10.0, -4.0).with_size(8.0, 8.0))
        .unwrap();

    let first = scene.world_transform(child).unwrap();
    let second = scene.world_transform(child).unwrap();
    assert_eq!(first, second);
    assert!(!scene.actor(child).unwrap().is_dirty());
}

#[test]
fn test_dirty_root_rebuilds_descendants() {
    let mut scene = Scene::new("graph");
    let root = scene.add_actor(Actor::new("root"));
    let child = scene.add_child(root, Actor::new("child").with_position(10.0, 0.0)).unwrap();
    let leaf = scene.add_child(child, Actor::new("leaf").with_position(5.0, 0.0)).unwrap();
    scene.update_transforms();
    assert_relative_eq!(scene.world_position(leaf).unwrap().x, 15.0);

    scene.actor_mut(root).unwrap().set_position(100.0, 0.0);
    scene.dirty(root);
    assert!(scene.actor(leaf).unwrap().is_dirty());

    let position = scene.world_position(leaf).unwrap();
    assert_relative_eq!(position.x, 115.0);
    assert!(!scene.actor(child).unwrap().is_dirty());
}

#[test]
fn test_parent_scale_composes() {
    let mut scene = Scene::new("graph");
    let root = scene.add_actor(Actor::new("root").with_scale(2.0, 3.0));
    let child = scene.add_child(root, Actor::new("child").with_scale(0.5, 2.0)).unwrap();
    scene.update_transforms();

    let accum = scene.actor(child).unwrap().accum_scale();
    assert_relative_eq!(accum.x, 1.0);
    assert_relative_eq!(accum.y, 6.0);
}

#[test]
fn test_wrapped_actors_stay_inside_extents() {
    let mut scene = Scene::new("wrap");
    scene.extents = Rect::new(-50.0, 0.0, 200.0, 100.0);
    let velocities = [(370.0, -45.0), (-1000.0, 15.0), (12.5, 999.0)];
    let ids: Vec<ActorId> = velocities
        .iter()
        .map(|&(vx, vy)| {
            let mut actor = Actor::new("rock").with_position(20.0, 50.0).with_velocity(vx, vy);
            actor.wrap_position = true;
            scene.add_actor(actor)
        })
        .collect();

    for _ in 0..120 {
        scene.update(1.0 / 60.0, &frame());
        for &id in &ids {
            let p = scene.actor(id).unwrap().position();
            assert!(p.x >= -50.0 && p.x <= 150.0, "x out of extents: {}", p.x);
            assert!(p.y >= 0.0 && p.y <= 100.0, "y out of extents: {}", p.y);
        }
    }
}

#[test]
fn test_wrap_keeps_overflow() {
    let mut scene = Scene::new("wrap");
    scene.extents = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut actor = Actor::new("ship").with_position(95.0, 50.0).with_velocity(100.0, 0.0);
    actor.wrap_position = true;
    let id = scene.add_actor(actor);

    scene.update(0.1, &frame());
    assert_relative_eq!(scene.actor(id).unwrap().x(), 5.0, epsilon = 1e-4);
}

#[test]
fn test_destroy_from_own_tick_is_deferred() {
    let mut scene = Scene::new("removal");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let names = ["a", "b", "c"];
    let ids: Vec<ActorId> = names
        .iter()
        .map(|&name| {
            let seen = Rc::clone(&seen);
            let actor = Actor::new(name).on_tick(move |scene: &mut Scene, id: ActorId, _dt: f32| {
                seen.borrow_mut().push(scene.actor(id).map(|a| a.name.clone()).unwrap_or_default());
                if scene.actor(id).is_some_and(|a| a.name == "a") {
                    scene.destroy_actor(id);
                }
                assert_eq!(scene.roots().len(), 3);
            });
            scene.add_actor(actor)
        })
        .collect();

    scene.update(0.016, &frame());
    assert_eq!(*seen.borrow(), vec!["a", "b", "c"]);
    assert_eq!(scene.roots(), &ids[1..]);

    seen.borrow_mut().clear();
    scene.update(0.016, &frame());
    assert_eq!(*seen.borrow(), vec!["b", "c"]);
}

#[test]
fn test_destroying_parent_fires_children_first() {
    let mut scene = Scene::new("removal");
    let order = Rc::new(RefCell::new(Vec::new()));
    let root = scene.add_actor(Actor::new("root"));
    let child = scene.add_child(root, Actor::new("child")).unwrap();

    for id in [root, child] {
        let order = Rc::clone(&order);
        scene.actor_mut(id).unwrap().on_destroy = Some(Box::new(move |scene: &mut Scene, id: ActorId| {
            order.borrow_mut().push(scene.actor(id).map(|a| a.name.clone()).unwrap_or_default());
        }));
    }

    scene.destroy_actor(root);
    scene.update(0.016, &frame());
    assert_eq!(*order.borrow(), vec!["child", "root"]);
    assert_eq!(scene.actor_count(), 0);
}

#[test]
fn test_child_destroyed_during_parent_traversal() {
    let mut scene = Scene::new("removal");
    let root = scene.add_actor(Actor::new("root"));
    let first = scene.add_child(root, Actor::new("first")).unwrap();
    let second = scene.add_child(root, Actor::new("second")).unwrap();
    let ticks = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&ticks);
    scene.actor_mut(second).unwrap().on_tick = Some(Box::new(move |_: &mut Scene, _: ActorId, _: f32| {
        *counter.borrow_mut() += 1;
    }));
    scene.actor_mut(first).unwrap().on_tick = Some(Box::new(move |scene: &mut Scene, id: ActorId, _: f32| {
        scene.destroy_actor(id);
    }));

    scene.update(0.016, &frame());
    assert_eq!(*ticks.borrow(), 1);
    assert_eq!(scene.children(root), &[second]);
}

#[test]
fn test_child_of_inactive_parent_is_removed() {
    let mut scene = Scene::new("removal");
    let root = scene.add_actor(Actor::new("root"));
    let child = scene.add_child(root, Actor::new("child")).unwrap();
    let leaf = scene.add_child(child, Actor::new("leaf")).unwrap();
    let destroyed = Rc::new(RefCell::new(Vec::new()));
    for id in [child, leaf] {
        let destroyed = Rc::clone(&destroyed);
        scene.actor_mut(id).unwrap().on_destroy = Some(Box::new(move |_: &mut Scene, id: ActorId| {
            destroyed.borrow_mut().push(id);
        }));
    }

    scene.actor_mut(root).unwrap().active = false;
    scene.destroy_actor(leaf);
    scene.update(0.016, &frame());
    assert!(!scene.contains(leaf));
    assert!(scene.children(child).is_empty());

    scene.destroy_actor(child);
    scene.update(0.016, &frame());
    assert!(!scene.contains(child));
    assert!(scene.children(root).is_empty());
    assert_eq!(*destroyed.borrow(), vec![leaf, child]);
}

#[test]
fn test_layer_change_resorts_after_frame() {
    let mut scene = Scene::new("layers");
    let back = scene.add_actor(Actor::new("back"));
    let front = scene.add_actor(Actor::new("front"));
    scene.update(0.016, &frame());
    assert_eq!(scene.roots(), &[back, front]);

    scene.actor_mut(back).unwrap().set_layer(5);
    scene.update(0.016, &frame());
    assert_eq!(scene.roots(), &[front, back]);
}

#[test]
fn test_property_round_trip() {
    let mut scene = Scene::new("props");
    let id = scene.add_actor(Actor::new("a"));
    assert!(scene.set_property(id, ActorProperty::Opacity, 3.0));
    assert_relative_eq!(scene.get_property(id, ActorProperty::Opacity).unwrap(), 1.0);
    assert_eq!(ActorProperty::from_name("vx"), Some(ActorProperty::Vx));
}

#[test]
fn test_angular_velocity_property_spins_actor() {
    let mut scene = Scene::new("props");
    let id = scene.add_actor(Actor::new("a"));
    assert!(scene.set_property(id, ActorProperty::Vr, 1.0));
    assert!(!scene.set_property(ActorId::default(), ActorProperty::Vr, 1.0));
    scene.update(0.5, &frame());
    assert_relative_eq!(scene.actor(id).unwrap().rotation(), 0.5);
}

//! Schedulers driven through scenes and the engine

use std::cell::RefCell;
use std::rc::Rc;

use actor_engine::prelude::*;
use approx::assert_relative_eq;

#[derive(Default)]
struct Log {
    calls: Vec<&'static str>,
}

#[test]
fn test_delayed_task_fires_on_fourth_step() {
    let mut log = Log::default();
    let mut tasks: actor_engine::scheduling::TaskManager<Log> = actor_engine::scheduling::TaskManager::new();
    tasks.add(
        Task::new("late", |log: &mut Log, _| log.calls.push("late"))
            .with_delay(2.0)
            .with_repeat(1),
    );

    for step in 1..=6 {
        tasks.execute(&mut log, 0.5);
        let expected = usize::from(step >= 4);
        assert_eq!(log.calls.len(), expected, "step {}", step);
    }
    assert!(tasks.is_empty());
}

#[test]
fn test_task_queue_runs_head_only() {
    let mut log = Log::default();
    let mut queue = TaskQueue::new();
    queue.add(Task::new("first", |log: &mut Log, _| log.calls.push("first")).with_repeat(3));
    queue.add(Task::new("second", |log: &mut Log, _| log.calls.push("second")).with_repeat(1));
    queue.add(Task::new("third", |log: &mut Log, _| log.calls.push("third")).with_repeat(1));

    for _ in 0..3 {
        queue.execute(&mut log, 0.1);
    }
    assert_eq!(log.calls, vec!["first", "first", "first"]);
    assert_eq!(queue.head().map(Task::name), Some("second"));

    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls.last(), Some(&"second"));
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls.last(), Some(&"third"));
    assert!(queue.is_empty());
}

#[test]
fn test_task_queue_keeps_stopped_head() {
    let mut log = Log::default();
    let mut queue = TaskQueue::new();
    queue.add(Task::new("ping", |log: &mut Log, _| log.calls.push("ping")).with_delay(-1.0));
    queue.add(
        Task::new("halt", |log: &mut Log, control: &mut TaskControl| {
            log.calls.push("halt");
            control.stop();
        })
        .with_repeat(3),
    );
    queue.add(Task::new("tail", |log: &mut Log, _| log.calls.push("tail")).with_repeat(1));

    queue.execute(&mut log, 0.1);
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls, vec!["ping"]);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.head().map(Task::state), Some(JobState::Stopped));

    assert!(queue.remove("ping").is_some());
    queue.execute(&mut log, 0.1);
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls, vec!["ping", "halt"]);
    assert_eq!(queue.head().map(Task::name), Some("halt"));
}

#[test]
fn test_task_queue_controls_by_name() {
    let mut log = Log::default();
    let mut queue = TaskQueue::new();
    queue.add(Task::new("loop", |log: &mut Log, _| log.calls.push("loop")));
    queue.add(Task::new("next", |log: &mut Log, _| log.calls.push("next")).with_repeat(1));

    assert!(queue.pause("loop"));
    queue.execute(&mut log, 0.1);
    assert!(log.calls.is_empty());

    assert!(queue.play("loop"));
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls, vec!["loop"]);

    assert!(queue.stop("loop"));
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls.len(), 1);
    assert_eq!(queue.find_mut("loop").map(|t| t.state()), Some(JobState::Stopped));

    assert!(queue.restart("loop"));
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls, vec!["loop", "loop"]);

    assert!(!queue.pause("missing"));
    queue.remove("loop");
    queue.execute(&mut log, 0.1);
    assert_eq!(log.calls.last(), Some(&"next"));
    assert!(queue.is_empty());
}

#[test]
fn test_scene_task_added_during_execution_runs_later() {
    let mut scene = Scene::new("tasks");
    let count = Rc::new(RefCell::new(0));
    let inner = Rc::clone(&count);
    scene.tasks.add(
        Task::new("spawner", move |scene: &mut Scene, _| {
            let inner = Rc::clone(&inner);
            scene.tasks.add(
                Task::new("spawned", move |_: &mut Scene, _| *inner.borrow_mut() += 1).with_repeat(1),
            );
        })
        .with_repeat(1),
    );

    let frame = FrameContext::default();
    scene.update(0.016, &frame);
    assert_eq!(*count.borrow(), 0);
    assert_eq!(scene.tasks.len(), 1);
    scene.update(0.016, &frame);
    assert_eq!(*count.borrow(), 1);
    assert!(scene.tasks.is_empty());
}

#[test]
fn test_actor_timeline_animates_property() {
    let mut scene = Scene::new("timeline");
    let id = scene.add_actor(Actor::new("a"));
    let ended = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ended);
    scene.actor_mut(id).unwrap().timelines.add(
        Timeline::new("slide").with_animation(
            Animation::actor_property("x", id, ActorProperty::X)
                .with_key(0.0, 0.0, Ease::Linear)
                .with_key(1.0, 100.0, Ease::Linear)
                .on_end(move |_| *flag.borrow_mut() = true),
        ),
    );

    let frame = FrameContext::default();
    for _ in 0..5 {
        scene.update(0.1, &frame);
    }
    assert_relative_eq!(scene.actor(id).unwrap().x(), 50.0, epsilon = 1e-3);

    for _ in 0..6 {
        scene.update(0.1, &frame);
    }
    assert_relative_eq!(scene.actor(id).unwrap().x(), 100.0);
    assert!(*ended.borrow());
    assert!(scene.actor(id).unwrap().timelines.is_empty());
}

#[test]
fn test_actions_run_in_order() {
    let mut scene = Scene::new("actions");
    let id = scene.add_actor(Actor::new("a"));
    scene.actor_mut(id).unwrap().actions.add(
        ActionsList::new("intro")
            .with_action(MoveTo::new(id, Vec2::new(40.0, 0.0), 0.4, Ease::Linear))
            .with_action(SetProperty::new(id, ActorProperty::Opacity, 0.5))
            .with_action(Destroy::new(id)),
    );

    let frame = FrameContext::default();
    for _ in 0..4 {
        scene.update(0.1, &frame);
    }
    let actor = scene.actor(id).unwrap();
    assert_relative_eq!(actor.x(), 40.0, epsilon = 1e-4);
    assert_relative_eq!(actor.visual.opacity, 1.0);

    scene.update(0.1, &frame);
    assert_relative_eq!(scene.actor(id).unwrap().visual.opacity, 0.5);
    scene.update(0.1, &frame);
    assert!(!scene.contains(id));
}

#[test]
fn test_follow_path_reaches_end() {
    let mut scene = Scene::new("path");
    let id = scene.add_actor(Actor::new("a"));
    let path = vec![Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(30.0, 40.0)];
    scene.actor_mut(id).unwrap().actions.add(
        ActionsList::new("patrol").with_action(FollowPath::new(id, path, 100.0).face_direction()),
    );

    let frame = FrameContext::default();
    scene.update(0.2, &frame);
    let actor = scene.actor(id).unwrap();
    assert_relative_eq!(actor.x(), 20.0, epsilon = 1e-4);
    assert_relative_eq!(actor.rotation(), 0.0);

    for _ in 0..5 {
        scene.update(0.2, &frame);
    }
    let actor = scene.actor(id).unwrap();
    assert_relative_eq!(actor.position(), Vec2::new(30.0, 40.0), epsilon = 1e-4);
    assert_relative_eq!(actor.rotation(), std::f32::consts::FRAC_PI_2);
    assert!(actor.actions.is_empty());
}

#[test]
fn test_degenerate_path_finishes_without_moving() {
    let mut scene = Scene::new("path");
    let id = scene.add_actor(Actor::new("a").with_position(5.0, 5.0));
    scene.actor_mut(id).unwrap().actions.add(
        ActionsList::new("stuck").with_action(FollowPath::new(id, vec![Vec2::new(50.0, 50.0)], 10.0)),
    );

    scene.update(0.1, &FrameContext::default());
    let actor = scene.actor(id).unwrap();
    assert_eq!(actor.position(), Vec2::new(5.0, 5.0));
    assert!(actor.actions.is_empty());
}

#[test]
fn test_limit_move_bounces() {
    let mut scene = Scene::new("limit");
    let id = scene.add_actor(Actor::new("a").with_position(95.0, 50.0).with_velocity(100.0, 0.0));
    scene.actor_mut(id).unwrap().actions.add(
        ActionsList::new("bounds").with_action(LimitMove::new(id, Rect::new(0.0, 0.0, 100.0, 100.0), true)),
    );

    let frame = FrameContext::default();
    scene.update(0.1, &frame);
    scene.update(0.1, &frame);
    let actor = scene.actor(id).unwrap();
    assert!(actor.x() <= 100.0);
    assert_relative_eq!(actor.motion.velocity.x, -100.0);
}

#[test]
fn test_engine_timeline_drives_engine_state() {
    let mut engine = Engine::new(EngineSettings::default());
    let id = engine.add_scene(Scene::new("main"));
    engine.add_timeline(
        Timeline::new("fade").with_animation(
            Animation::new("camera", move |engine: &mut Engine, value| {
                if let Some(scene) = engine.scene_mut(id) {
                    scene.camera.position.x = value;
                }
            })
            .with_key(0.0, 0.0, Ease::Linear)
            .with_key(0.5, 10.0, Ease::Linear),
        ),
    );

    for _ in 0..5 {
        engine.update(0.1);
    }
    assert_relative_eq!(engine.scene(id).unwrap().camera.position.x, 10.0);
    assert!(engine.timelines.is_empty());
}

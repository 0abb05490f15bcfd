//! Per-frame scene and actor update pipeline

use super::{FrameContext, Scene};
use crate::actor::virtual_canvas::child_in_view;
use crate::foundation::collections::ActorId;
use crate::foundation::math::{utils, Vec2};

impl Scene {
    /// Advance the scene by one frame
    ///
    /// Order: scene tick hook, scene schedulers, camera, root actors in list
    /// order, physics step and contact dispatch, root removals, root layer
    /// sort.
    pub fn update(&mut self, dt: f32, frame: &FrameContext) {
        self.design_size = frame.design_size;
        self.debug = frame.debug;
        self.last_dt = dt;

        if let Some(mut on_tick) = self.on_tick.take() {
            on_tick(self, dt);
            if self.on_tick.is_none() {
                self.on_tick = Some(on_tick);
            }
        }

        self.run_scene_schedulers(dt);
        let camera_moved = self.update_camera(dt);

        let count = self.roots.len();
        for i in 0..count {
            let Some(&id) = self.roots.get(i) else {
                break;
            };
            self.update_actor(id, dt, camera_moved);
        }

        self.step_physics(dt, frame);
        self.drain_removals(None);
        self.sort_layers(None);
    }

    fn run_scene_schedulers(&mut self, dt: f32) {
        let mut timelines = std::mem::take(&mut self.timelines);
        timelines.update(self, dt);
        timelines.merge_from(std::mem::take(&mut self.timelines));
        self.timelines = timelines;

        let mut actions = std::mem::take(&mut self.actions);
        actions.execute(self, dt);
        actions.merge_from(std::mem::take(&mut self.actions));
        self.actions = actions;

        let mut tasks = std::mem::take(&mut self.tasks);
        tasks.execute(self, dt);
        tasks.merge_from(std::mem::take(&mut self.tasks));
        self.tasks = tasks;
    }

    fn update_camera(&mut self, dt: f32) -> bool {
        let target_x = self.camera.target_x;
        let target_y = self.camera.target_y;
        let goal_x = target_x.and_then(|id| self.world_position(id)).map(|p| p.x);
        let goal_y = target_y.and_then(|id| self.world_position(id)).map(|p| p.y);
        let extents = self.extents;
        let design = self.design_size;
        self.camera.update(dt, [goal_x, goal_y], &extents, design)
    }

    fn run_actor_schedulers(&mut self, id: ActorId, dt: f32) {
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let mut timelines = std::mem::take(&mut actor.timelines);
        timelines.update(self, dt);
        if let Some(actor) = self.actors.get_mut(id) {
            timelines.merge_from(std::mem::take(&mut actor.timelines));
            actor.timelines = timelines;
        }

        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let mut actions = std::mem::take(&mut actor.actions);
        actions.execute(self, dt);
        if let Some(actor) = self.actors.get_mut(id) {
            actions.merge_from(std::mem::take(&mut actor.actions));
            actor.actions = actions;
        }

        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let mut tasks = std::mem::take(&mut actor.tasks);
        tasks.execute(self, dt);
        if let Some(actor) = self.actors.get_mut(id) {
            tasks.merge_from(std::mem::take(&mut actor.tasks));
            actor.tasks = tasks;
        }
    }

    /// Run the update pipeline for one actor and its subtree
    fn update_actor(&mut self, id: ActorId, dt: f32, camera_moved: bool) {
        match self.actors.get(id) {
            Some(actor) if actor.active && actor.in_view => {}
            Some(_) => {
                self.drain_skipped(id);
                return;
            }
            None => return,
        }

        let on_tick = self.actors.get_mut(id).and_then(|a| a.on_tick.take());
        if let Some(mut on_tick) = on_tick {
            on_tick(self, id, dt);
            if let Some(actor) = self.actors.get_mut(id) {
                if actor.on_tick.is_none() {
                    actor.on_tick = Some(on_tick);
                }
            }
        }

        self.run_actor_schedulers(id, dt);
        self.update_virtual_canvas(id, dt);
        self.integrate_actor(id, dt, camera_moved);

        let count = self.children(id).len();
        for i in 0..count {
            let Some(child) = self.actors.get(id).and_then(|a| a.children.get(i).copied()) else {
                break;
            };
            self.update_actor(child, dt, camera_moved);
        }

        self.drain_removals(Some(id));
        self.sort_layers(Some(id));
    }

    /// Apply removals queued inside a subtree that is not updated this frame
    fn drain_skipped(&mut self, id: ActorId) {
        let count = self.children(id).len();
        for i in 0..count {
            let Some(child) = self.actors.get(id).and_then(|a| a.children.get(i).copied()) else {
                break;
            };
            self.drain_skipped(child);
        }
        self.drain_removals(Some(id));
    }

    /// Frame animation, motion, wrapping, docking and dirty marking
    fn integrate_actor(&mut self, id: ActorId, dt: f32, camera_moved: bool) {
        let Some(actor) = self.actors.get(id) else {
            return;
        };

        let body_state = actor.body.and_then(|body| {
            let world = self.physics.as_ref()?;
            Some((world.body_position(body)?, world.body_angle(body)?))
        });
        let container_half = self.dock_container_half(id);
        let world_scale = self.world_scale();
        let extents = self.extents;

        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        actor.frames.advance(dt);

        let before = (actor.transform.position, actor.transform.rotation, actor.transform.depth);
        let mut spinning = false;
        match body_state {
            Some((position, angle)) => {
                actor.transform.position = position * world_scale;
                actor.transform.rotation = angle;
            }
            None => {
                spinning = actor.motion.angular_velocity != 0.0;
                let step = actor.motion.integrate(dt);
                actor.transform.position += step.delta;
                actor.transform.rotation += step.rotation;
                actor.transform.depth += step.depth;
            }
        }

        if actor.wrap_position {
            let p = &mut actor.transform.position;
            p.x = utils::wrap(p.x, extents.x, extents.w);
            p.y = utils::wrap(p.y, extents.y, extents.h);
        }

        if actor.dock.is_docked() {
            let half = actor.half_extents();
            actor.transform.position = actor.dock.resolve(actor.transform.position, half, container_half);
        }

        let after = (actor.transform.position, actor.transform.rotation, actor.transform.depth);
        let parallax = camera_moved && actor.transform.has_parallax();
        if before != after || spinning || parallax {
            actor.mark_dirty();
        }
    }

    /// Half extents of the area an actor docks against
    fn dock_container_half(&self, id: ActorId) -> Vec2 {
        let Some(actor) = self.actors.get(id) else {
            return Vec2::zeros();
        };
        if let Some(parent) = actor.parent.and_then(|p| self.actors.get(p)) {
            if parent.canvas.is_some() {
                return parent.transform.size * 0.5;
            }
        }
        if actor.dock.screen {
            self.design_size * 0.5
        } else {
            self.size * 0.5
        }
    }

    /// Coast a virtual canvas and lay out its children after scrolling
    fn update_virtual_canvas(&mut self, id: ActorId, dt: f32) {
        let Some(canvas) = self.actors.get_mut(id).and_then(|a| a.canvas.as_mut()) else {
            return;
        };
        let delta = canvas.update(dt);
        if delta != Vec2::zeros() {
            self.layout_canvas_children(id, delta);
        }
    }

    /// Move non-docked children by `delta`, re-dock docked children and cull
    /// children outside the canvas
    pub(crate) fn layout_canvas_children(&mut self, id: ActorId, delta: Vec2) {
        let Some(canvas_actor) = self.actors.get(id) else {
            return;
        };
        let canvas_half = canvas_actor.transform.size * 0.5;
        let clip = canvas_actor.canvas.as_ref().is_some_and(|c| c.clip_virtual);
        let children = canvas_actor.children.clone();

        for child in children {
            let Some(actor) = self.actors.get_mut(child) else {
                continue;
            };
            let half = actor.half_extents();
            let position = if actor.dock.is_docked() {
                actor.dock.resolve(actor.transform.position, half, canvas_half)
            } else {
                actor.transform.position + delta
            };
            actor.set_position(position.x, position.y);
            if clip {
                actor.in_view = child_in_view(position, half, canvas_half);
            }
        }
        self.dirty(id);
    }
}

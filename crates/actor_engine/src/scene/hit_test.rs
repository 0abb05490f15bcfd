//! Hit testing and touch routing

use super::Scene;
use crate::actor::Actor;
use crate::callbacks::TouchFn;
use crate::foundation::collections::ActorId;
use crate::foundation::math::Vec2;

/// Touch currently tracked by a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchState {
    /// Actor hit when the touch began
    pub actor: Option<ActorId>,
    /// Point where the touch began
    pub start: Vec2,
    /// Last reported point
    pub last: Vec2,
    /// Nearest virtual canvas at or above the touched actor
    pub canvas: Option<ActorId>,
    /// Per-second velocity of the last move
    pub velocity: Vec2,
    /// True between `touch_begin` and `touch_end`
    pub down: bool,
}

impl Scene {
    /// Topmost touchable actor under `point` (screen space)
    ///
    /// Children are tested before their parent and siblings in reverse
    /// order. A non-touchable, invisible or inactive actor hides its whole
    /// subtree.
    pub fn hit_test(&mut self, point: Vec2) -> Option<ActorId> {
        self.update_transforms();
        self.roots
            .iter()
            .rev()
            .find_map(|&id| self.hit_test_actor(id, point))
    }

    fn hit_test_actor(&self, id: ActorId, point: Vec2) -> Option<ActorId> {
        let actor = self.actors.get(id)?;
        if !actor.touchable || !actor.visible || !actor.active || !actor.in_view {
            return None;
        }
        if let Some(hit) = actor
            .children
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_actor(child, point))
        {
            return Some(hit);
        }
        let camera = (!actor.ignore_camera).then_some(self.camera.position);
        actor.transform.contains_point(point, camera).then_some(id)
    }

    /// Start a touch; returns the actor that was hit
    ///
    /// A hit virtual canvas grabs the touch. With nothing hit and panning
    /// enabled the touch pans the camera.
    pub fn touch_begin(&mut self, point: Vec2) -> Option<ActorId> {
        let hit = self.hit_test(point);
        let canvas = hit.and_then(|id| self.canvas_for(id));
        self.touch = TouchState {
            actor: hit,
            canvas,
            start: point,
            last: point,
            velocity: Vec2::zeros(),
            down: true,
        };

        match hit {
            Some(id) => {
                if let Some(canvas) = canvas.and_then(|c| self.actors.get_mut(c)).and_then(|a| a.canvas.as_mut()) {
                    canvas.begin_touch();
                }
                self.fire_touch(id, point, |a| &mut a.on_begin_touch);
            }
            None => {
                if self.camera.touch_pan.iter().any(|&p| p) {
                    self.camera.panning = true;
                    self.camera.velocity = Vec2::zeros();
                }
            }
        }
        hit
    }

    /// Move the current touch
    pub fn touch_move(&mut self, point: Vec2) {
        if !self.touch.down {
            return;
        }
        let delta = point - self.touch.last;
        self.touch.last = point;
        if self.last_dt > 0.0 {
            self.touch.velocity = delta / self.last_dt;
        }

        if let Some(id) = self.touch.actor {
            if let Some(canvas_id) = self.touch.canvas {
                let applied = self
                    .actors
                    .get_mut(canvas_id)
                    .and_then(|a| a.canvas.as_mut())
                    .map(|canvas| canvas.scroll_by(delta));
                if let Some(applied) = applied.filter(|d| *d != Vec2::zeros()) {
                    self.layout_canvas_children(canvas_id, applied);
                }
            }
            self.fire_touch(id, point, |a| &mut a.on_move_touch);
        } else if self.camera.panning {
            for axis in 0..2 {
                if self.camera.touch_pan[axis] {
                    self.camera.position[axis] -= delta[axis];
                }
            }
        }
    }

    /// End the current touch
    ///
    /// Fires `on_end_touch` on the touched actor, and `on_tapped` as well if
    /// the touch ends over it. Canvases and the camera keep the flick
    /// velocity.
    pub fn touch_end(&mut self) {
        if !self.touch.down {
            return;
        }
        let touch = std::mem::take(&mut self.touch);

        if let Some(id) = touch.actor {
            if let Some(canvas) = touch.canvas.and_then(|c| self.actors.get_mut(c)).and_then(|a| a.canvas.as_mut()) {
                canvas.end_touch(touch.velocity);
            }
            self.fire_touch(id, touch.last, |a| &mut a.on_end_touch);
            if self.hit_test(touch.last) == Some(id) {
                self.fire_touch(id, touch.last, |a| &mut a.on_tapped);
            }
        } else if self.camera.panning {
            self.camera.panning = false;
            for axis in 0..2 {
                if self.camera.touch_pan[axis] {
                    self.camera.velocity[axis] = -touch.velocity[axis];
                }
            }
        }
    }

    /// Nearest actor at or above `id` that is a virtual canvas
    fn canvas_for(&self, id: ActorId) -> Option<ActorId> {
        let mut current = Some(id);
        while let Some(actor_id) = current {
            let actor = self.actors.get(actor_id)?;
            if actor.canvas.is_some() {
                return Some(actor_id);
            }
            current = actor.parent;
        }
        None
    }

    fn fire_touch(
        &mut self,
        id: ActorId,
        point: Vec2,
        slot: fn(&mut Actor) -> &mut Option<TouchFn>,
    ) {
        let Some(mut callback) = self.actors.get_mut(id).and_then(|a| slot(a).take()) else {
            return;
        };
        callback(self, id, point);
        if let Some(actor) = self.actors.get_mut(id) {
            let stored = slot(actor);
            if stored.is_none() {
                *stored = Some(callback);
            }
        }
    }
}

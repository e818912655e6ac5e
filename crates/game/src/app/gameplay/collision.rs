use foxgrove_engine::{Rect, Vec2};

use super::actor::MobileActor;
use super::motion::{CorrectionReason, Kinematics};
use super::props::{CollisionPolicy, Prop, PropId, Tree};

pub struct StaticContext<'a> {
    pub legal: Rect,
    /// Displacement the actor applied this tick; pushes move props by it.
    pub motion: Vec2,
    pub can_push: bool,
    pub trees: &'a [Tree],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOutcome {
    /// Overlapping a pushable this tick, whether or not it moved.
    pub pushing: bool,
    pub pushed: Vec<PropId>,
    pub interactable_in_range: Option<PropId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Blocked,
    OutOfBounds,
}

struct StaticPass<'a, 'k> {
    ctx: &'k StaticContext<'a>,
    kinematics: &'k mut Kinematics,
    body: Rect,
    previous_body: Rect,
    outcome: StaticOutcome,
    /// Props cleared to move; applied only if the actor keeps its position.
    pending_pushes: Vec<usize>,
}

impl StaticPass<'_, '_> {
    fn revert(&mut self, reason: CorrectionReason) {
        self.kinematics.revert(reason);
        self.body = self.previous_body;
    }
}

type PolicyFn = fn(&mut StaticPass<'_, '_>, &mut [Prop], usize);

const POLICY_TABLE: [PolicyFn; CollisionPolicy::COUNT] = [
    resolve_block,
    resolve_push,
    resolve_trample,
    resolve_interact,
    resolve_ignore,
];

/// Resolves an actor against props (by category, in resolution order) and
/// then trees. Props are mutated in place; the collections never change
/// length.
pub fn resolve_static<A: MobileActor + ?Sized>(
    actor: &mut A,
    ctx: &StaticContext<'_>,
    props: &mut [Prop],
) -> StaticOutcome {
    let body = actor.body_rect();
    let previous_body = actor.previous_body_rect();
    let mut pass = StaticPass {
        ctx,
        kinematics: actor.kinematics_mut(),
        body,
        previous_body,
        outcome: StaticOutcome::default(),
        pending_pushes: Vec::new(),
    };

    for policy in CollisionPolicy::RESOLUTION_ORDER {
        let handler = POLICY_TABLE[policy.index()];
        for index in 0..props.len() {
            let prop = &props[index];
            if !prop.flags.spawned || prop.kind().policy() != policy {
                continue;
            }
            handler(&mut pass, props, index);
        }
    }

    if ctx.trees.iter().any(|tree| tree.blocks(&pass.body)) {
        pass.revert(CorrectionReason::Blocked);
    }

    if !pass.kinematics.was_reverted() {
        for index in pass.pending_pushes.drain(..) {
            props[index].translate(ctx.motion);
            pass.outcome.pushed.push(props[index].id());
        }
    }
    pass.outcome
}

fn resolve_block(pass: &mut StaticPass<'_, '_>, props: &mut [Prop], index: usize) {
    if props[index].flags.collidable && props[index].collision_rect().overlaps(&pass.body) {
        pass.revert(CorrectionReason::Blocked);
    }
}

fn resolve_push(pass: &mut StaticPass<'_, '_>, props: &mut [Prop], index: usize) {
    if !props[index].collision_rect().overlaps(&pass.body) {
        return;
    }
    pass.outcome.pushing = true;
    if !pass.ctx.can_push || pass.kinematics.was_reverted() {
        pass.revert(CorrectionReason::Blocked);
        return;
    }
    match check_push(props, index, pass.ctx.motion, &pass.ctx.legal, pass.ctx.trees) {
        PushOutcome::Pushed => pass.pending_pushes.push(index),
        PushOutcome::Blocked | PushOutcome::OutOfBounds => {
            pass.revert(CorrectionReason::PushFailed)
        }
    }
}

fn resolve_trample(pass: &mut StaticPass<'_, '_>, props: &mut [Prop], index: usize) {
    if props[index].collision_rect().overlaps(&pass.body) {
        props[index].mark_trampled();
    }
}

fn resolve_interact(pass: &mut StaticPass<'_, '_>, props: &mut [Prop], index: usize) {
    let prop = &props[index];
    if prop.flags.collidable && prop.collision_rect().overlaps(&pass.body) {
        pass.revert(CorrectionReason::Blocked);
    }
    let prop = &props[index];
    if prop.flags.interactable
        && pass.outcome.interactable_in_range.is_none()
        && prop.interact_rect().overlaps(&pass.body)
    {
        pass.outcome.interactable_in_range = Some(prop.id());
    }
}

fn resolve_ignore(_pass: &mut StaticPass<'_, '_>, _props: &mut [Prop], _index: usize) {}

/// Moves `props[index]` by `motion` unless it is already out of bounds or the
/// move would leave `legal` or hit a non-moveable obstacle.
pub fn try_push(
    props: &mut [Prop],
    index: usize,
    motion: Vec2,
    legal: &Rect,
    trees: &[Tree],
) -> PushOutcome {
    let outcome = check_push(props, index, motion, legal, trees);
    if outcome == PushOutcome::Pushed {
        props[index].translate(motion);
    }
    outcome
}

fn check_push(
    props: &[Prop],
    index: usize,
    motion: Vec2,
    legal: &Rect,
    trees: &[Tree],
) -> PushOutcome {
    let Some(prop) = props.get(index) else {
        return PushOutcome::Blocked;
    };
    if !legal.contains_rect(&prop.collision_rect()) {
        return PushOutcome::OutOfBounds;
    }
    if motion == Vec2::ZERO {
        return PushOutcome::Blocked;
    }
    let candidate = prop.collision_rect_at(prop.position() + motion);
    if !legal.contains_rect(&candidate) {
        return PushOutcome::Blocked;
    }
    let hits_fixed = props.iter().enumerate().any(|(other_index, other)| {
        other_index != index
            && other.flags.spawned
            && other.flags.collidable
            && !other.flags.moveable
            && matches!(
                other.kind().policy(),
                CollisionPolicy::Block | CollisionPolicy::Interact
            )
            && other.collision_rect().overlaps(&candidate)
    });
    if hits_fixed || trees.iter().any(|tree| tree.blocks(&candidate)) {
        return PushOutcome::Blocked;
    }
    PushOutcome::Pushed
}

#[cfg(test)]
mod tests {
    use foxgrove_engine::Direction;

    use super::*;
    use crate::app::gameplay::actor::{ActivityFlags, MobileActor};
    use crate::app::gameplay::motion::step;
    use crate::app::gameplay::props::PropKind;
    use crate::app::gameplay::vitals::Vitals;

    struct Probe {
        kinematics: Kinematics,
        vitals: Vitals,
    }

    impl Probe {
        fn at(x: f32, y: f32) -> Self {
            Self {
                kinematics: Kinematics::new(Vec2::new(x, y)),
                vitals: Vitals::new(1.0),
            }
        }
    }

    impl MobileActor for Probe {
        fn kinematics(&self) -> &Kinematics {
            &self.kinematics
        }
        fn kinematics_mut(&mut self) -> &mut Kinematics {
            &mut self.kinematics
        }
        fn body_rect_at(&self, position: Vec2) -> Rect {
            Rect::from_origin_size(position, Vec2::new(10.0, 10.0))
        }
        fn active_attack_rect(&self) -> Option<Rect> {
            None
        }
        fn vitals(&self) -> &Vitals {
            &self.vitals
        }
        fn facing(&self) -> Direction {
            Direction::Right
        }
        fn activity(&self) -> ActivityFlags {
            ActivityFlags::default()
        }
        fn is_invulnerable(&self) -> bool {
            false
        }
    }

    fn legal() -> Rect {
        Rect::new(0.0, 0.0, 500.0, 500.0)
    }

    fn prop(id: u32, kind: PropKind, x: f32, y: f32) -> Prop {
        Prop::new(PropId(id), kind, Vec2::new(x, y), Vec2::new(16.0, 16.0))
    }

    fn move_right(probe: &mut Probe, speed: f32) -> Vec2 {
        step(&mut probe.kinematics, Vec2::new(1.0, 0.0), speed, false);
        probe.kinematics.delta()
    }

    #[test]
    fn blocking_prop_reverts_to_tick_start() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![prop(0, PropKind::Wall, 111.0, 100.0)];
        let motion = move_right(&mut probe, 2.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
        assert_eq!(
            probe.kinematics.correction(),
            Some(CorrectionReason::Blocked)
        );
    }

    #[test]
    fn unspawned_prop_is_ignored() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![prop(0, PropKind::Wall, 111.0, 100.0).with_spawned(false)];
        let motion = move_right(&mut probe, 2.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(102.0, 100.0));
    }

    #[test]
    fn push_moves_boulder_and_keeps_actor_moving() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![prop(0, PropKind::Boulder, 110.5, 100.0)];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        let outcome = resolve_static(&mut probe, &ctx, &mut props);
        assert!(outcome.pushing);
        assert_eq!(outcome.pushed, vec![PropId(0)]);
        assert_eq!(props[0].position(), Vec2::new(111.5, 100.0));
        assert_eq!(probe.kinematics.position(), Vec2::new(101.0, 100.0));
    }

    #[test]
    fn push_into_wall_reverts_actor_and_leaves_boulder() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![
            prop(0, PropKind::Boulder, 110.5, 100.0),
            prop(1, PropKind::Rock, 124.5, 100.0),
        ];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
        assert_eq!(props[0].position(), Vec2::new(110.5, 100.0));
    }

    #[test]
    fn boulder_already_out_of_bounds_blocks() {
        let mut props = vec![prop(0, PropKind::Boulder, 495.0, 10.0)];
        assert_eq!(
            try_push(&mut props, 0, Vec2::new(-1.0, 0.0), &legal(), &[]),
            PushOutcome::OutOfBounds
        );
    }

    #[test]
    fn actors_that_cannot_push_are_blocked_by_pushables() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![prop(0, PropKind::Boulder, 110.5, 100.0)];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: false,
            trees: &[],
        };
        resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
        assert_eq!(props[0].position(), Vec2::new(110.5, 100.0));
    }

    #[test]
    fn grass_never_blocks_and_interactables_report_range() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![
            prop(0, PropKind::Grass, 100.0, 100.0),
            prop(1, PropKind::Npc, 115.0, 100.0),
        ];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        let outcome = resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(101.0, 100.0));
        assert_eq!(outcome.interactable_in_range, Some(PropId(1)));
        props[0].tick(0.1, 0.6);
        assert!(props[0].flags.active);
    }

    #[test]
    fn trees_block_after_props() {
        let mut probe = Probe::at(100.0, 100.0);
        let trees = [Tree::new(Vec2::new(90.0, 40.0), Vec2::new(40.0, 80.0))];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &trees,
        };
        resolve_static(&mut probe, &ctx, &mut []);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn interactable_just_outside_inflated_rect_is_not_in_range() {
        let mut probe = Probe::at(100.0, 100.0);
        // Interact rect starts at 121 - 8 = 113; the moved body ends at 111.
        let mut props = vec![prop(0, PropKind::Npc, 121.0, 100.0)];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        let outcome = resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(outcome.interactable_in_range, None);
    }

    #[test]
    fn tree_revert_after_push_leaves_boulder_in_place() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![prop(0, PropKind::Boulder, 110.5, 100.0)];
        let trees = [Tree::new(Vec2::new(80.0, 40.0), Vec2::new(40.0, 80.0))];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &trees,
        };
        let outcome = resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
        assert_eq!(props[0].position(), Vec2::new(110.5, 100.0));
        assert!(outcome.pushed.is_empty());
        assert!(outcome.pushing);
    }

    #[test]
    fn interactable_revert_after_push_leaves_boulder_in_place() {
        let mut probe = Probe::at(100.0, 100.0);
        let mut props = vec![
            prop(0, PropKind::Boulder, 110.5, 100.0),
            prop(1, PropKind::Treasure, 90.0, 109.5),
        ];
        let motion = move_right(&mut probe, 1.0);
        let ctx = StaticContext {
            legal: legal(),
            motion,
            can_push: true,
            trees: &[],
        };
        let outcome = resolve_static(&mut probe, &ctx, &mut props);
        assert_eq!(probe.kinematics.position(), Vec2::new(100.0, 100.0));
        assert_eq!(props[0].position(), Vec2::new(110.5, 100.0));
        assert!(outcome.pushed.is_empty());
    }
}

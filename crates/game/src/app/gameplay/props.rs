use foxgrove_engine::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Wall,
    Rock,
    Fence,
    Boulder,
    Stump,
    Grass,
    Flower,
    Treasure,
    Altar,
    AnimatedAltar,
    Npc,
    Sign,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPolicy {
    Block,
    Push,
    Trample,
    Interact,
    Ignore,
}

impl CollisionPolicy {
    pub const COUNT: usize = 5;

    /// Categories are resolved in this order within one actor's pass.
    pub const RESOLUTION_ORDER: [CollisionPolicy; 4] = [
        CollisionPolicy::Block,
        CollisionPolicy::Push,
        CollisionPolicy::Trample,
        CollisionPolicy::Interact,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::Block => 0,
            Self::Push => 1,
            Self::Trample => 2,
            Self::Interact => 3,
            Self::Ignore => 4,
        }
    }
}

impl PropKind {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "wall" => Self::Wall,
            "rock" => Self::Rock,
            "fence" => Self::Fence,
            "boulder" => Self::Boulder,
            "stump" => Self::Stump,
            "grass" => Self::Grass,
            "flower" => Self::Flower,
            "treasure" | "chest" => Self::Treasure,
            "altar" => Self::Altar,
            "animatedaltar" => Self::AnimatedAltar,
            "npc" => Self::Npc,
            "sign" => Self::Sign,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Rock => "rock",
            Self::Fence => "fence",
            Self::Boulder => "boulder",
            Self::Stump => "stump",
            Self::Grass => "grass",
            Self::Flower => "flower",
            Self::Treasure => "treasure",
            Self::Altar => "altar",
            Self::AnimatedAltar => "animated_altar",
            Self::Npc => "npc",
            Self::Sign => "sign",
            Self::Unknown => "unknown",
        }
    }

    pub fn policy(self) -> CollisionPolicy {
        match self {
            Self::Wall | Self::Rock | Self::Fence | Self::Unknown => CollisionPolicy::Block,
            Self::Boulder | Self::Stump => CollisionPolicy::Push,
            Self::Grass => CollisionPolicy::Trample,
            Self::Treasure | Self::Altar | Self::AnimatedAltar | Self::Npc | Self::Sign => {
                CollisionPolicy::Interact
            }
            Self::Flower => CollisionPolicy::Ignore,
        }
    }

    /// Props that can be interacted with again after they report opened.
    pub fn resets_after_interaction(self) -> bool {
        matches!(self, Self::Npc | Self::AnimatedAltar)
    }

    fn default_flags(self) -> PropFlags {
        let policy = self.policy();
        PropFlags {
            collidable: policy != CollisionPolicy::Ignore,
            moveable: policy == CollisionPolicy::Push,
            interactable: policy == CollisionPolicy::Interact,
            spawned: true,
            active: false,
            opened: false,
        }
    }

    fn collision_rect(self, origin: Vec2, footprint: Vec2) -> Rect {
        match self {
            Self::Boulder | Self::Stump => {
                Rect::from_origin_size(origin, footprint * PUSHABLE_FOOTPRINT_FRACTION)
            }
            Self::Flower => Rect::new(origin.x, origin.y, 0.0, 0.0),
            _ => Rect::from_origin_size(origin, footprint),
        }
    }
}

const PUSHABLE_FOOTPRINT_FRACTION: f32 = 0.875;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropFlags {
    pub collidable: bool,
    pub moveable: bool,
    pub interactable: bool,
    pub spawned: bool,
    pub active: bool,
    pub opened: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    id: PropId,
    kind: PropKind,
    position: Vec2,
    footprint: Vec2,
    pub flags: PropFlags,
    group: Option<String>,
    reward: Option<String>,
    open_elapsed: f32,
    trampled_this_tick: bool,
}

impl Prop {
    /// `footprint` is the scaled sprite size in world units.
    pub fn new(id: PropId, kind: PropKind, position: Vec2, footprint: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            footprint,
            flags: kind.default_flags(),
            group: None,
            reward: None,
            open_elapsed: 0.0,
            trampled_this_tick: false,
        }
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn with_reward(mut self, reward: Option<String>) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_spawned(mut self, spawned: bool) -> Self {
        self.flags.spawned = spawned;
        self
    }

    pub fn id(&self) -> PropId {
        self.id
    }

    pub fn kind(&self) -> PropKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn reward(&self) -> Option<&str> {
        self.reward.as_deref()
    }

    pub fn collision_rect(&self) -> Rect {
        self.collision_rect_at(self.position)
    }

    pub fn collision_rect_at(&self, position: Vec2) -> Rect {
        self.kind.collision_rect(position, self.footprint)
    }

    /// Full footprint grown by half its size on every side.
    pub fn interact_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.footprint)
            .inflated(self.footprint.x * 0.5, self.footprint.y * 0.5)
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub(crate) fn mark_trampled(&mut self) {
        self.trampled_this_tick = true;
    }

    /// End-of-tick upkeep: trample state follows this tick's overlaps and an
    /// active interaction runs its open timer.
    pub(crate) fn tick(&mut self, dt: f32, interaction_seconds: f32) {
        match self.kind.policy() {
            CollisionPolicy::Trample => {
                self.flags.active = self.trampled_this_tick;
                self.trampled_this_tick = false;
            }
            CollisionPolicy::Interact => {
                if self.flags.active && !self.flags.opened {
                    self.open_elapsed += dt;
                    if self.open_elapsed >= interaction_seconds {
                        self.flags.opened = true;
                        self.open_elapsed = 0.0;
                    }
                } else {
                    self.open_elapsed = 0.0;
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub position: Vec2,
    pub footprint: Vec2,
    pub spawned: bool,
}

impl Tree {
    pub fn new(position: Vec2, footprint: Vec2) -> Self {
        Self {
            position,
            footprint,
            spawned: true,
        }
    }

    /// Lower trunk strip of the footprint; the canopy never blocks.
    pub fn collision_rect(&self) -> Rect {
        Rect::new(
            self.position.x + self.footprint.x * 0.23,
            self.position.y + self.footprint.y * 0.75,
            self.footprint.x * 0.53,
            self.footprint.y * 0.25,
        )
    }

    pub fn blocks(&self, body: &Rect) -> bool {
        self.spawned && self.collision_rect().overlaps(body)
    }
}

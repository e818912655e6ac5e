use foxgrove_engine::Rect;

use super::commands::WorldCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub u32);

/// World-authored zone that fires when the hero body enters it. Firing is
/// edge-triggered: staying inside does not fire again until the hero leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerZone {
    id: TriggerId,
    name: String,
    rect: Rect,
    command: WorldCommand,
    once: bool,
    fired: bool,
    occupied: bool,
}

impl TriggerZone {
    pub fn new(id: TriggerId, name: impl Into<String>, rect: Rect, command: WorldCommand) -> Self {
        Self {
            id,
            name: name.into(),
            rect,
            command,
            once: true,
            fired: false,
            occupied: false,
        }
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn evaluate(&mut self, hero_body: &Rect) -> Option<WorldCommand> {
        let inside = self.rect.overlaps(hero_body);
        let entered = inside && !self.occupied;
        self.occupied = inside;
        if !entered || (self.once && self.fired) {
            return None;
        }
        self.fired = true;
        Some(self.command.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(once: bool) -> TriggerZone {
        TriggerZone::new(
            TriggerId(0),
            "cave",
            Rect::new(0.0, 0.0, 20.0, 20.0),
            WorldCommand::SpawnProps {
                group: "cave".to_string(),
            },
        )
        .with_once(once)
    }

    #[test]
    fn fires_on_entry_only() {
        let mut zone = zone(false);
        let inside = Rect::new(5.0, 5.0, 4.0, 4.0);
        let outside = Rect::new(50.0, 50.0, 4.0, 4.0);
        assert!(zone.evaluate(&inside).is_some());
        assert!(zone.evaluate(&inside).is_none());
        assert!(zone.evaluate(&outside).is_none());
        assert!(zone.evaluate(&inside).is_some());
    }

    #[test]
    fn once_zone_never_refires() {
        let mut zone = zone(true);
        let inside = Rect::new(5.0, 5.0, 4.0, 4.0);
        let outside = Rect::new(50.0, 50.0, 4.0, 4.0);
        assert!(zone.evaluate(&inside).is_some());
        zone.evaluate(&outside);
        assert!(zone.evaluate(&inside).is_none());
        assert!(zone.has_fired());
    }
}

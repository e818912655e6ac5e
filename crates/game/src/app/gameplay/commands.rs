#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldCommand {
    SpawnProps { group: String },
    DespawnProps { group: String },
    SwitchArea { area: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldCommandKind {
    SpawnProps,
    DespawnProps,
    SwitchArea,
}

impl WorldCommand {
    /// Builds a command from a content trigger's `effect`/`target` pair.
    pub fn from_effect(effect: &str, target: &str) -> Option<Self> {
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        let target = target.to_string();
        match effect.trim() {
            "SpawnProps" => Some(Self::SpawnProps { group: target }),
            "DespawnProps" => Some(Self::DespawnProps { group: target }),
            "SwitchArea" => Some(Self::SwitchArea { area: target }),
            _ => None,
        }
    }

    pub fn kind(&self) -> WorldCommandKind {
        match self {
            Self::SpawnProps { .. } => WorldCommandKind::SpawnProps,
            Self::DespawnProps { .. } => WorldCommandKind::DespawnProps,
            Self::SwitchArea { .. } => WorldCommandKind::SwitchArea,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandApplyStats {
    pub total: u32,
    pub spawn_props: u32,
    pub despawn_props: u32,
    pub switch_area: u32,
    pub invalid_target_count: u32,
    pub props_toggled: u32,
}

impl CommandApplyStats {
    pub(crate) fn record_command(&mut self, kind: WorldCommandKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            WorldCommandKind::SpawnProps => self.spawn_props = self.spawn_props.saturating_add(1),
            WorldCommandKind::DespawnProps => {
                self.despawn_props = self.despawn_props.saturating_add(1)
            }
            WorldCommandKind::SwitchArea => self.switch_area = self.switch_area.saturating_add(1),
        }
    }

    pub(crate) fn record_invalid_target(&mut self) {
        self.invalid_target_count = self.invalid_target_count.saturating_add(1);
    }

    pub(crate) fn record_props_toggled(&mut self, count: u32) {
        self.props_toggled = self.props_toggled.saturating_add(count);
    }
}

/// Structural changes queued during a tick and applied at its commit point.
#[derive(Debug, Default)]
pub struct WorldCommandQueue {
    commands: Vec<WorldCommand>,
    last_tick_apply_stats: CommandApplyStats,
}

impl WorldCommandQueue {
    pub fn enqueue(&mut self, command: WorldCommand) {
        self.commands.push(command);
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn drain_current_tick(&mut self) -> Vec<WorldCommand> {
        std::mem::take(&mut self.commands)
    }

    pub(crate) fn set_last_tick_apply_stats(&mut self, stats: CommandApplyStats) {
        self.last_tick_apply_stats = stats;
    }

    pub fn last_tick_apply_stats(&self) -> &CommandApplyStats {
        &self.last_tick_apply_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_map_to_commands() {
        assert_eq!(
            WorldCommand::from_effect("SpawnProps", "cave"),
            Some(WorldCommand::SpawnProps {
                group: "cave".to_string()
            })
        );
        assert_eq!(
            WorldCommand::from_effect("SwitchArea", " village "),
            Some(WorldCommand::SwitchArea {
                area: "village".to_string()
            })
        );
        assert_eq!(WorldCommand::from_effect("Explode", "cave"), None);
        assert_eq!(WorldCommand::from_effect("SpawnProps", "  "), None);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut queue = WorldCommandQueue::default();
        queue.enqueue(WorldCommand::DespawnProps {
            group: "gate".to_string(),
        });
        assert_eq!(queue.pending(), 1);
        let drained = queue.drain_current_tick();
        assert_eq!(drained.len(), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn stats_count_per_kind() {
        let mut stats = CommandApplyStats::default();
        stats.record_command(WorldCommandKind::SpawnProps);
        stats.record_command(WorldCommandKind::SwitchArea);
        stats.record_invalid_target();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.spawn_props, 1);
        assert_eq!(stats.switch_area, 1);
        assert_eq!(stats.invalid_target_count, 1);
    }
}

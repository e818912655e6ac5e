use std::collections::HashMap;

use super::enemy::{EnemyTier, Race};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceTally {
    pub registered: u32,
    pub kills: u32,
    pub boss_kills: u32,
}

/// Kill bookkeeping shared by every enemy of a race. Passed explicitly into
/// the tick instead of living in globals.
#[derive(Debug, Clone, Default)]
pub struct WorldProgress {
    tallies: HashMap<Race, RaceTally>,
}

impl WorldProgress {
    /// Counts a normal-tier enemy toward its race's total.
    pub fn register(&mut self, race: Race) {
        let tally = self.tallies.entry(race).or_default();
        tally.registered = tally.registered.saturating_add(1);
    }

    pub fn record_kill(&mut self, race: Race, tier: EnemyTier) {
        let tally = self.tallies.entry(race).or_default();
        match tier {
            EnemyTier::Boss => tally.boss_kills = tally.boss_kills.saturating_add(1),
            EnemyTier::Normal | EnemyTier::Wildlife => {
                tally.kills = tally.kills.saturating_add(1)
            }
        }
    }

    pub fn tally(&self, race: Race) -> RaceTally {
        self.tallies.get(&race).copied().unwrap_or_default()
    }

    pub fn kills(&self, race: Race) -> u32 {
        self.tally(race).kills
    }

    pub fn registered(&self, race: Race) -> u32 {
        self.tally(race).registered
    }

    /// True once every registered normal of `race` is down; a race with no
    /// normals counts as cleared.
    pub fn all_normals_defeated(&self, race: Race) -> bool {
        let tally = self.tally(race);
        tally.kills >= tally.registered
    }

    pub fn total_kills(&self) -> u32 {
        self.tallies
            .values()
            .fold(0u32, |sum, tally| {
                sum.saturating_add(tally.kills).saturating_add(tally.boss_kills)
            })
    }

    pub fn reset(&mut self) {
        self.tallies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normals_defeated_tracks_registrations() {
        let mut progress = WorldProgress::default();
        assert!(progress.all_normals_defeated(Race::Bear));

        progress.register(Race::Bear);
        progress.register(Race::Bear);
        progress.record_kill(Race::Bear, EnemyTier::Normal);
        assert!(!progress.all_normals_defeated(Race::Bear));
        progress.record_kill(Race::Bear, EnemyTier::Normal);
        assert!(progress.all_normals_defeated(Race::Bear));
        assert!(progress.all_normals_defeated(Race::Toad));
    }

    #[test]
    fn boss_kills_are_tallied_separately() {
        let mut progress = WorldProgress::default();
        progress.register(Race::Ghost);
        progress.record_kill(Race::Ghost, EnemyTier::Boss);
        assert_eq!(progress.kills(Race::Ghost), 0);
        assert_eq!(progress.tally(Race::Ghost).boss_kills, 1);
        assert_eq!(progress.total_kills(), 1);

        progress.reset();
        assert_eq!(progress.registered(Race::Ghost), 0);
    }
}

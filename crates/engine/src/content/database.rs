use std::collections::HashMap;

use crate::app::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnemyDefId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaDefId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDef {
    pub id: EnemyDefId,
    pub def_name: String,
    pub race: String,
    pub tier: String,
    pub max_health: f32,
    pub speed: f32,
    pub aggro_radius: f32,
    pub attack_range: f32,
    pub ranged: Option<bool>,
    pub scale: f32,
    pub frame_size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaDef {
    pub id: AreaDefId,
    pub def_name: String,
    pub width: f32,
    pub height: f32,
    pub map_scale: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
}

impl AreaDef {
    /// Legal rectangle for actors: the scaled map minus the per-edge margins.
    pub fn legal_rect(&self) -> Rect {
        let map_width = self.width * self.map_scale;
        let map_height = self.height * self.map_scale;
        Rect::new(
            self.margin_left,
            self.margin_top,
            (map_width - self.margin_left - self.margin_right).max(0.0),
            (map_height - self.margin_top - self.margin_bottom).max(0.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropPlacement {
    pub kind: String,
    pub position: Vec2,
    pub size: Vec2,
    pub scale: f32,
    pub group: Option<String>,
    pub spawned: bool,
    pub reward: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreePlacement {
    pub position: Vec2,
    pub size: Vec2,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyPlacement {
    pub def_name: String,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPlacement {
    pub id: String,
    pub rect: Rect,
    pub effect: String,
    pub target: String,
    pub once: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    pub def_name: String,
    pub area: String,
    pub hero_start: Vec2,
    pub props: Vec<PropPlacement>,
    pub trees: Vec<TreePlacement>,
    pub enemies: Vec<EnemyPlacement>,
    pub triggers: Vec<TriggerPlacement>,
}

#[derive(Debug, Default, Clone)]
pub struct DefDatabase {
    enemy_defs: Vec<EnemyDef>,
    enemy_ids_by_name: HashMap<String, EnemyDefId>,
    area_defs: Vec<AreaDef>,
    area_ids_by_name: HashMap<String, AreaDefId>,
    level_defs: Vec<LevelDef>,
}

impl DefDatabase {
    pub(crate) fn from_defs(
        mut enemy_defs: Vec<EnemyDef>,
        mut area_defs: Vec<AreaDef>,
        level_defs: Vec<LevelDef>,
    ) -> Self {
        let mut enemy_ids_by_name = HashMap::with_capacity(enemy_defs.len());
        for (idx, def) in enemy_defs.iter_mut().enumerate() {
            let id = EnemyDefId(idx as u32);
            def.id = id;
            enemy_ids_by_name.insert(def.def_name.clone(), id);
        }
        let mut area_ids_by_name = HashMap::with_capacity(area_defs.len());
        for (idx, def) in area_defs.iter_mut().enumerate() {
            let id = AreaDefId(idx as u32);
            def.id = id;
            area_ids_by_name.insert(def.def_name.clone(), id);
        }
        Self {
            enemy_defs,
            enemy_ids_by_name,
            area_defs,
            area_ids_by_name,
            level_defs,
        }
    }

    pub fn enemy_def_id_by_name(&self, name: &str) -> Option<EnemyDefId> {
        self.enemy_ids_by_name.get(name).copied()
    }

    pub fn enemy_def(&self, id: EnemyDefId) -> Option<&EnemyDef> {
        self.enemy_defs.get(id.0 as usize)
    }

    pub fn enemy_def_by_name(&self, name: &str) -> Option<&EnemyDef> {
        self.enemy_def_id_by_name(name)
            .and_then(|id| self.enemy_def(id))
    }

    pub fn enemy_defs(&self) -> &[EnemyDef] {
        &self.enemy_defs
    }

    pub fn area_def_by_name(&self, name: &str) -> Option<&AreaDef> {
        self.area_ids_by_name
            .get(name)
            .and_then(|id| self.area_defs.get(id.0 as usize))
    }

    pub fn area_defs(&self) -> &[AreaDef] {
        &self.area_defs
    }

    pub fn level_def(&self, name: &str) -> Option<&LevelDef> {
        self.level_defs.iter().find(|level| level.def_name == name)
    }

    pub fn level_defs(&self) -> &[LevelDef] {
        &self.level_defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_rect_applies_scale_and_margins() {
        let area = AreaDef {
            id: AreaDefId(0),
            def_name: "forest".to_string(),
            width: 100.0,
            height: 50.0,
            map_scale: 4.0,
            margin_left: 10.0,
            margin_top: 20.0,
            margin_right: 30.0,
            margin_bottom: 40.0,
        };
        assert_eq!(area.legal_rect(), Rect::new(10.0, 20.0, 360.0, 140.0));
    }
}

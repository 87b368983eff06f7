use super::*;

const SUMMON_ATTEMPTS: usize = 24;
const SUMMON_FALLBACK_CELLS: i32 = 3;

impl GameEngine {
    /// Scripted spawn for a cursed note: an enemy appears out of sight range
    /// but close enough to find the player quickly.
    pub(super) fn spawn_summoned_enemy(&mut self, note_idx: usize) -> Option<u32> {
        let Some(position) = self.pick_summon_position() else {
            let message = "something tried to follow you and could not".to_string();
            warn!(note = note_idx, "{message}");
            self.events.push(RuntimeEvent::Notice { message });
            return None;
        };

        let id = self.area.next_enemy_id();
        let heading = heading_toward(position, self.player.position);
        self.area.enemies.push(Enemy::new(id, position, heading));
        self.events.push(RuntimeEvent::EnemySpawned { enemy_id: id });
        info!(
            enemy = id,
            note = note_idx,
            x = position.x,
            z = position.z,
            "enemy summoned"
        );
        Some(id)
    }

    fn pick_summon_position(&mut self) -> Option<Vec3> {
        let collision = CollisionResolver::new(&self.area.grid);
        let player = self.player.position;

        for _ in 0..SUMMON_ATTEMPTS {
            let angle = self.rng.angle();
            let distance = self
                .rng
                .range(SCRIPTED_SPAWN_DISTANCE_MIN, SCRIPTED_SPAWN_DISTANCE_MAX);
            let offset = Vec3::from_heading(angle) * distance;
            let candidate = Vec3::new(player.x + offset.x, 0.0, player.z + offset.z);
            if collision.is_blocked(candidate) || collision.overlaps(candidate, ENEMY_RADIUS) {
                continue;
            }
            return Some(candidate);
        }

        // fall back to a reachable open cell about SUMMON_FALLBACK_CELLS away
        let start = cell_of(&self.area.grid, player);
        self.area
            .grid
            .reachable_from(start)
            .into_iter()
            .filter(|cell| cell.manhattan(start) >= 2)
            .max_by_key(|cell| (-(cell.manhattan(start) - SUMMON_FALLBACK_CELLS).abs(), *cell))
            .map(|cell| self.area.grid.cell_center(cell.x, cell.z))
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::affect::{AffectModel, GlitchEvent};
use crate::constants::{
    ACTIVATION_RADIUS, CORRUPTED_SANITY, FACING_ALIGNMENT_THRESHOLD, LOCKED_DOOR_SANITY_PENALTY,
    MEDKIT_HEALTH, NOTE_SANITY_PENALTY, PILLS_SANITY, PLAYER_EYE_HEIGHT,
    POSTER_ACTIVATION_RADIUS, POSTER_FACING_ALIGNMENT_THRESHOLD, POSTER_SANITY_PENALTY,
    POSTER_TRIGGER_CHANCE,
};
use crate::error::{check_range, ConfigResult, SimIssue};
use crate::inventory::Inventory;
use crate::rng::Rng;
use crate::speech::SpeechLimiter;
use crate::types::{GenerationMode, ItemKind, RuntimeEvent, SpeechCause, Vec3};
use crate::world::Area;

const POSTER_LINES: [&str; 4] = [
    "Its eyes follow the flashlight, not me.",
    "I have seen this face before. In the mirror.",
    "The paper is warm.",
    "Someone drew a door on it. It is slightly open.",
];

const MIN_CONE_DISTANCE: f32 = 1e-4;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionParams {
    pub activation_radius: f32,
    pub facing_alignment_threshold: f32,
    pub poster_activation_radius: f32,
    pub poster_facing_alignment_threshold: f32,
    pub poster_trigger_chance: f32,
    pub locked_door_sanity_penalty: f32,
    pub note_sanity_penalty: f32,
    pub poster_sanity_penalty: f32,
    pub medkit_health: f32,
    pub pills_sanity: f32,
    pub corrupted_sanity: f32,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            activation_radius: ACTIVATION_RADIUS,
            facing_alignment_threshold: FACING_ALIGNMENT_THRESHOLD,
            poster_activation_radius: POSTER_ACTIVATION_RADIUS,
            poster_facing_alignment_threshold: POSTER_FACING_ALIGNMENT_THRESHOLD,
            poster_trigger_chance: POSTER_TRIGGER_CHANCE,
            locked_door_sanity_penalty: LOCKED_DOOR_SANITY_PENALTY,
            note_sanity_penalty: NOTE_SANITY_PENALTY,
            poster_sanity_penalty: POSTER_SANITY_PENALTY,
            medkit_health: MEDKIT_HEALTH,
            pills_sanity: PILLS_SANITY,
            corrupted_sanity: CORRUPTED_SANITY,
        }
    }
}

impl InteractionParams {
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("interaction.activation_radius", self.activation_radius, 0.0, 100.0)?;
        check_range(
            "interaction.facing_alignment_threshold",
            self.facing_alignment_threshold,
            -1.0,
            1.0,
        )?;
        check_range(
            "interaction.poster_activation_radius",
            self.poster_activation_radius,
            0.0,
            100.0,
        )?;
        check_range(
            "interaction.poster_facing_alignment_threshold",
            self.poster_facing_alignment_threshold,
            -1.0,
            1.0,
        )?;
        check_range("interaction.poster_trigger_chance", self.poster_trigger_chance, 0.0, 1.0)?;
        for (name, value) in [
            ("interaction.locked_door_sanity_penalty", self.locked_door_sanity_penalty),
            ("interaction.note_sanity_penalty", self.note_sanity_penalty),
            ("interaction.poster_sanity_penalty", self.poster_sanity_penalty),
            ("interaction.medkit_health", self.medkit_health),
            ("interaction.pills_sanity", self.pills_sanity),
            ("interaction.corrupted_sanity", self.corrupted_sanity),
        ] {
            check_range(name, value, 0.0, 100.0)?;
        }
        Ok(())
    }
}

/// Which gameplay object an interactable stands for, by index into the area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractableKind {
    Door { door: usize },
    Key { key: usize },
    Item { item: usize },
    Note { note: usize },
    Poster { poster: usize },
}

#[derive(Clone, Debug)]
pub struct Interactable {
    pub id: usize,
    pub position: Vec3,
    pub activation_radius: f32,
    pub facing_alignment_threshold: f32,
    pub display_text: String,
    pub kind: InteractableKind,
    /// Passive targets may fire on their own while targeted.
    pub passive: bool,
    pub consumed: bool,
}

fn door_text(mode: GenerationMode, locked: bool) -> String {
    match (mode, locked) {
        (_, true) => "Locked door".to_string(),
        (GenerationMode::Block, false) => "Enter building".to_string(),
        (GenerationMode::Corridor, false) => "Open door".to_string(),
    }
}

/// Rebuilds `area.interactables` from the area's objects.
pub fn attach_interactables(area: &mut Area, params: &InteractionParams) {
    let mut out = Vec::new();
    let mut push = |position: Vec3, display_text: String, kind: InteractableKind, poster: bool| {
        let (activation_radius, facing_alignment_threshold) = if poster {
            (
                params.poster_activation_radius,
                params.poster_facing_alignment_threshold,
            )
        } else {
            (params.activation_radius, params.facing_alignment_threshold)
        };
        let id = out.len();
        out.push(Interactable {
            id,
            position,
            activation_radius,
            facing_alignment_threshold,
            display_text,
            kind,
            passive: poster,
            consumed: false,
        });
    };

    for (idx, door) in area.doors.iter().enumerate() {
        push(
            area.face_midpoint(door.cell, door.approach),
            door_text(area.mode, door.locked),
            InteractableKind::Door { door: idx },
            false,
        );
    }
    for (idx, key) in area.keys.iter().enumerate() {
        push(
            area.grid.cell_center(key.cell.x, key.cell.z),
            "Pick up key".to_string(),
            InteractableKind::Key { key: idx },
            false,
        );
    }
    for (idx, item) in area.items.iter().enumerate() {
        push(
            area.grid.cell_center(item.cell.x, item.cell.z),
            item.kind.label().to_string(),
            InteractableKind::Item { item: idx },
            false,
        );
    }
    for (idx, note) in area.notes.iter().enumerate() {
        push(
            area.grid.cell_center(note.cell.x, note.cell.z),
            "Read note".to_string(),
            InteractableKind::Note { note: idx },
            false,
        );
    }
    for (idx, poster) in area.posters.iter().enumerate() {
        let mut position = area.face_midpoint(poster.wall, poster.facing);
        position.y += PLAYER_EYE_HEIGHT;
        push(
            position,
            "Poster".to_string(),
            InteractableKind::Poster { poster: idx },
            true,
        );
    }

    area.interactables = out;
}

/// Distance to `target` if it lies inside the activation cone, else `None`.
/// A target at (near) zero distance is treated as aligned.
pub fn cone_distance(
    origin: Vec3,
    facing: Vec3,
    target: Vec3,
    radius: f32,
    threshold: f32,
) -> Option<f32> {
    let to_target = target - origin;
    let distance = to_target.length_xz();
    if distance > radius {
        return None;
    }
    if distance < MIN_CONE_DISTANCE {
        return Some(distance);
    }
    let facing = facing.normalized_xz()?;
    let dir = to_target * (1.0 / distance);
    if dir.dot_xz(facing) > threshold {
        Some(distance)
    } else {
        None
    }
}

pub struct InteractionContext<'a> {
    pub area: &'a mut Area,
    pub affect: &'a mut AffectModel,
    pub inventory: &'a mut Inventory,
    pub speech: &'a mut SpeechLimiter,
    pub events: &'a mut Vec<RuntimeEvent>,
    pub now_ms: u64,
}

/// What the engine must do after an activation, beyond the side effects
/// already applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    Nothing,
    Handled,
    EnterPocket { door: usize },
    Summon { note: usize },
}

pub struct InteractionRouter {
    params: InteractionParams,
    current: Option<usize>,
}

impl InteractionRouter {
    pub fn new(params: InteractionParams) -> Self {
        Self {
            params,
            current: None,
        }
    }

    pub fn params(&self) -> &InteractionParams {
        &self.params
    }

    pub fn current_target(&self) -> Option<usize> {
        self.current
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn display_text<'a>(&self, area: &'a Area) -> Option<&'a str> {
        self.current
            .and_then(|id| area.interactables.get(id))
            .map(|target| target.display_text.as_str())
    }

    /// Closest live interactable inside its own cone wins.
    pub fn scan(&mut self, interactables: &[Interactable], origin: Vec3, facing: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for target in interactables.iter().filter(|target| !target.consumed) {
            let Some(distance) = cone_distance(
                origin,
                facing,
                target.position,
                target.activation_radius,
                target.facing_alignment_threshold,
            ) else {
                continue;
            };
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((target.id, distance));
            }
        }
        self.current = best.map(|(id, _)| id);
        self.current
    }

    pub fn activate(&mut self, ctx: &mut InteractionContext<'_>) -> ActivationOutcome {
        let Some(id) = self.current else {
            return ActivationOutcome::Nothing;
        };
        let kind = match ctx.area.interactables.get(id) {
            None => {
                self.current = None;
                return ActivationOutcome::Nothing;
            }
            Some(target) if target.consumed => {
                debug!("{}", SimIssue::ActionOnConsumedEntity { id });
                return ActivationOutcome::Nothing;
            }
            Some(target) => target.kind,
        };

        match kind {
            InteractableKind::Door { door } => self.activate_door(ctx, id, door),
            InteractableKind::Key { key } => {
                let key_id = ctx.area.keys[key].key_id;
                ctx.inventory.add_key(key_id);
                ctx.area.interactables[id].consumed = true;
                ctx.events.push(RuntimeEvent::KeyTaken { key_id });
                self.current = None;
                ActivationOutcome::Handled
            }
            InteractableKind::Item { item } => {
                let kind = ctx.area.items[item].kind;
                ctx.inventory.add_item(kind);
                ctx.area.interactables[id].consumed = true;
                ctx.events.push(RuntimeEvent::ItemTaken { item: kind });
                self.current = None;
                ActivationOutcome::Handled
            }
            InteractableKind::Note { note } => self.read_note(ctx, note),
            InteractableKind::Poster { poster } => {
                let image = ctx.area.posters[poster].image;
                let text = POSTER_LINES[image % POSTER_LINES.len()].to_string();
                ctx.speech.request(&text, SpeechCause::Dialogue, ctx.now_ms);
                ctx.events.push(RuntimeEvent::Dialogue { text });
                ActivationOutcome::Handled
            }
        }
    }

    fn activate_door(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        id: usize,
        door_idx: usize,
    ) -> ActivationOutcome {
        let mode = ctx.area.mode;
        let door = ctx.area.doors[door_idx].clone();

        if door.locked {
            if let Some(key_id) = door.key_id {
                if !ctx.inventory.consume_key(key_id) {
                    let sanity = ctx
                        .affect
                        .apply_sanity(-self.params.locked_door_sanity_penalty);
                    debug!(door = door_idx, key_id, sanity, "door locked, key missing");
                    ctx.speech
                        .request("It's locked.", SpeechCause::Door, ctx.now_ms);
                    ctx.events.push(RuntimeEvent::DoorLocked { door: door_idx });
                    return ActivationOutcome::Handled;
                }
            }
            ctx.area.grid.unlock_door(door.cell.x, door.cell.z);
            ctx.area.doors[door_idx].locked = false;
            ctx.area.interactables[id].display_text = door_text(mode, false);
            debug!(door = door_idx, "door unlocked");
            ctx.events.push(RuntimeEvent::DoorUnlocked { door: door_idx });
        }

        ctx.area.doors[door_idx].open = true;
        ctx.events.push(RuntimeEvent::DoorOpened { door: door_idx });
        match mode {
            GenerationMode::Block => ActivationOutcome::EnterPocket { door: door_idx },
            GenerationMode::Corridor => {
                ctx.area.interactables[id].consumed = true;
                self.current = None;
                ActivationOutcome::Handled
            }
        }
    }

    fn read_note(&mut self, ctx: &mut InteractionContext<'_>, note_idx: usize) -> ActivationOutcome {
        let note = &mut ctx.area.notes[note_idx];
        let first_read = !note.read;
        note.read = true;
        let text = note.text.clone();
        let summon = note.cursed && first_read;

        let sanity = ctx.affect.apply_sanity(-self.params.note_sanity_penalty);
        ctx.affect.boost_glitch(GlitchEvent::NoteRead);
        debug!(note = note_idx, sanity, cursed = summon, "note read");
        ctx.speech.request(&text, SpeechCause::Note, ctx.now_ms);
        ctx.events.push(RuntimeEvent::NoteOpened { text });

        if summon {
            ActivationOutcome::Summon { note: note_idx }
        } else {
            ActivationOutcome::Handled
        }
    }

    /// Gives the current target a chance to fire on its own. The rng is only
    /// drawn from when that target is passive.
    pub fn tick_passive(&mut self, ctx: &mut InteractionContext<'_>, rng: &mut Rng) -> bool {
        let Some(target) = self.current.and_then(|id| ctx.area.interactables.get(id)) else {
            return false;
        };
        if !target.passive || target.consumed {
            return false;
        }
        let InteractableKind::Poster { poster } = target.kind else {
            return false;
        };
        if !rng.bool(self.params.poster_trigger_chance) {
            return false;
        }

        ctx.affect.boost_glitch(GlitchEvent::PosterStare);
        let sanity = ctx.affect.apply_sanity(-self.params.poster_sanity_penalty);
        debug!(poster, sanity, "poster stare");
        ctx.events.push(RuntimeEvent::PosterStare { poster });
        true
    }

    /// Consumes the selected inventory item.
    pub fn quick_use(&self, ctx: &mut InteractionContext<'_>) -> Option<ItemKind> {
        let item = ctx.inventory.take_selected()?;
        match item {
            ItemKind::Medkit => {
                ctx.affect.apply_health(self.params.medkit_health);
            }
            ItemKind::Pills => {
                ctx.affect.apply_sanity(self.params.pills_sanity);
            }
            ItemKind::Corrupted => {
                ctx.affect.apply_sanity(self.params.corrupted_sanity);
                ctx.affect.boost_glitch(GlitchEvent::CorruptedItem);
                ctx.speech
                    .request("That was not medicine.", SpeechCause::Item, ctx.now_ms);
            }
        }
        ctx.events.push(RuntimeEvent::ItemUsed { item });
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affect::AffectParams;
    use crate::grid::{Cell, Grid};
    use crate::speech::SpeechOptions;
    use crate::types::CellPos;
    use crate::world::{Door, Item, KeyPickup, Note, Poster};

    struct Harness {
        area: Area,
        affect: AffectModel,
        inventory: Inventory,
        speech: SpeechLimiter,
        events: Vec<RuntimeEvent>,
    }

    impl Harness {
        fn new(mode: GenerationMode) -> Self {
            let mut grid = Grid::filled(10, 10, 2.0, Vec3::ZERO, Cell::Empty);
            grid.force_border_solid();
            grid.set(5, 2, Cell::Solid);
            grid.set(
                5,
                4,
                Cell::Door {
                    locked: true,
                    key_id: Some(1),
                },
            );
            let mut area = Area {
                seed: 1,
                mode,
                grid,
                rooms: Vec::new(),
                doors: vec![Door {
                    cell: CellPos::new(5, 4),
                    approach: CellPos::new(4, 4),
                    locked: true,
                    key_id: Some(1),
                    open: false,
                }],
                keys: vec![KeyPickup {
                    key_id: 1,
                    cell: CellPos::new(2, 7),
                }],
                items: vec![Item {
                    kind: ItemKind::Medkit,
                    cell: CellPos::new(7, 7),
                }],
                notes: vec![Note {
                    text: "It only moves when you stop looking.".to_string(),
                    cell: CellPos::new(2, 2),
                    cursed: true,
                    read: false,
                }],
                posters: vec![Poster {
                    wall: CellPos::new(5, 2),
                    facing: CellPos::new(4, 2),
                    image: 1,
                }],
                enemies: Vec::new(),
                interactables: Vec::new(),
                spawn: CellPos::new(1, 1),
                exit: None,
                notices: Vec::new(),
            };
            attach_interactables(&mut area, &InteractionParams::default());
            Self {
                area,
                affect: AffectModel::new(AffectParams::default()),
                inventory: Inventory::default(),
                speech: SpeechLimiter::new(SpeechOptions {
                    min_gap_ms: 0,
                    max_per_window: 100,
                    ..SpeechOptions::default()
                }),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> InteractionContext<'_> {
            InteractionContext {
                area: &mut self.area,
                affect: &mut self.affect,
                inventory: &mut self.inventory,
                speech: &mut self.speech,
                events: &mut self.events,
                now_ms: 0,
            }
        }
    }

    const EAST: Vec3 = Vec3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    fn target_door(router: &mut InteractionRouter, harness: &Harness) {
        // approach cell (4,4) centre is (9,9); the door face is at x=10
        let picked = router.scan(&harness.area.interactables, Vec3::new(9.0, 0.0, 9.0), EAST);
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn locked_door_without_key_costs_sanity_and_stays_locked() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams::default());
        target_door(&mut router, &harness);

        let outcome = router.activate(&mut harness.ctx());

        assert_eq!(outcome, ActivationOutcome::Handled);
        assert!(harness.area.doors[0].locked);
        assert!(!harness.area.grid.is_passable(5, 4));
        assert_eq!(harness.affect.sanity(), 100.0 - LOCKED_DOOR_SANITY_PENALTY);
        assert!(matches!(
            harness.events.as_slice(),
            [RuntimeEvent::DoorLocked { door: 0 }]
        ));
        assert_eq!(harness.speech.pending().len(), 1);
    }

    #[test]
    fn held_key_unlocks_and_is_consumed() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        harness.inventory.add_key(1);
        let mut router = InteractionRouter::new(InteractionParams::default());
        target_door(&mut router, &harness);

        let outcome = router.activate(&mut harness.ctx());

        assert_eq!(outcome, ActivationOutcome::Handled);
        assert!(harness.inventory.view().keys.is_empty());
        assert!(harness.area.grid.is_passable(5, 4));
        assert!(harness.area.doors[0].open);
        assert!(harness.area.interactables[0].consumed);
        assert_eq!(harness.affect.sanity(), 100.0);
    }

    #[test]
    fn surface_door_leads_into_a_pocket() {
        let mut harness = Harness::new(GenerationMode::Block);
        harness.inventory.add_key(1);
        let mut router = InteractionRouter::new(InteractionParams::default());
        target_door(&mut router, &harness);

        assert_eq!(
            router.activate(&mut harness.ctx()),
            ActivationOutcome::EnterPocket { door: 0 }
        );
    }

    #[test]
    fn pickups_go_to_inventory_once() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams::default());
        // item cell (7,7) centre is (15,15)
        let picked = router.scan(
            &harness.area.interactables,
            Vec3::new(13.0, 0.0, 15.0),
            EAST,
        );
        let item_id = harness
            .area
            .interactables
            .iter()
            .position(|i| i.kind == InteractableKind::Item { item: 0 });
        assert_eq!(picked, item_id);

        router.activate(&mut harness.ctx());
        assert_eq!(harness.inventory.items(), &[ItemKind::Medkit]);

        // the consumed target is skipped by the next scan and ignored if forced
        assert_eq!(
            router.scan(&harness.area.interactables, Vec3::new(13.0, 0.0, 15.0), EAST),
            None
        );
        router.current = item_id;
        assert_eq!(router.activate(&mut harness.ctx()), ActivationOutcome::Nothing);
        assert_eq!(harness.inventory.items().len(), 1);
    }

    #[test]
    fn cursed_note_summons_only_on_first_read() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams::default());
        let note_id = harness
            .area
            .interactables
            .iter()
            .position(|i| i.kind == InteractableKind::Note { note: 0 });
        router.current = note_id;

        assert_eq!(
            router.activate(&mut harness.ctx()),
            ActivationOutcome::Summon { note: 0 }
        );
        assert_eq!(router.activate(&mut harness.ctx()), ActivationOutcome::Handled);
        assert_eq!(harness.affect.sanity(), 100.0 - 2.0 * NOTE_SANITY_PENALTY);
        assert!(harness.affect.glitch() > 0.0);
    }

    #[test]
    fn scan_respects_cone_and_prefers_closest() {
        let origin = Vec3::new(0.0, 0.0, 0.0);
        assert!(cone_distance(origin, EAST, Vec3::new(2.0, 0.0, 0.2), 3.0, 0.8).is_some());
        assert!(cone_distance(origin, EAST, Vec3::new(0.0, 0.0, 2.0), 3.0, 0.8).is_none());
        assert!(cone_distance(origin, EAST, Vec3::new(5.0, 0.0, 0.0), 3.0, 0.8).is_none());
        assert_eq!(cone_distance(origin, EAST, origin, 3.0, 0.99), Some(0.0));

        let harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams::default());
        let looking_away = router.scan(
            &harness.area.interactables,
            Vec3::new(9.0, 0.0, 9.0),
            Vec3::new(-1.0, 0.0, 0.0),
        );
        assert_eq!(looking_away, None);
        assert_eq!(router.display_text(&harness.area), None);
    }

    #[test]
    fn passive_poster_can_stare_back() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams {
            poster_trigger_chance: 1.0,
            ..InteractionParams::default()
        });
        // facing cell (4,2) centre is (9,5); the poster hangs on the x=10 face
        let picked = router.scan(&harness.area.interactables, Vec3::new(9.0, 0.0, 5.0), EAST);
        let poster_id = harness
            .area
            .interactables
            .iter()
            .position(|i| i.kind == InteractableKind::Poster { poster: 0 });
        assert_eq!(picked, poster_id);
        assert_eq!(router.display_text(&harness.area), Some("Poster"));

        let mut rng = Rng::new(3);
        assert!(router.tick_passive(&mut harness.ctx(), &mut rng));
        assert_eq!(harness.affect.sanity(), 100.0 - POSTER_SANITY_PENALTY);
        assert!(harness.affect.glitch() > 0.0);
    }

    #[test]
    fn non_passive_targets_leave_the_rng_alone() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let mut router = InteractionRouter::new(InteractionParams {
            poster_trigger_chance: 1.0,
            ..InteractionParams::default()
        });
        target_door(&mut router, &harness);

        let mut rng = Rng::new(3);
        let mut untouched = Rng::new(3);
        assert!(!router.tick_passive(&mut harness.ctx(), &mut rng));
        assert_eq!(rng.next_u32(), untouched.next_u32());
    }

    #[test]
    fn quick_use_applies_item_effects() {
        let mut harness = Harness::new(GenerationMode::Corridor);
        let router = InteractionRouter::new(InteractionParams::default());
        harness.affect.apply_health(-50.0);
        harness.inventory.add_item(ItemKind::Medkit);
        harness.inventory.add_item(ItemKind::Corrupted);

        assert_eq!(router.quick_use(&mut harness.ctx()), Some(ItemKind::Medkit));
        assert_eq!(harness.affect.health(), 50.0 + MEDKIT_HEALTH);

        harness.affect.apply_sanity(-60.0);
        assert_eq!(router.quick_use(&mut harness.ctx()), Some(ItemKind::Corrupted));
        assert_eq!(harness.affect.sanity(), 40.0 + CORRUPTED_SANITY);
        assert!(harness.affect.glitch() > 0.0);
        assert_eq!(router.quick_use(&mut harness.ctx()), None);
    }
}

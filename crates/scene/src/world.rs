use crate::components::{Primitive, PrimitiveKind};
use crate::entity::EntityId;
use foundation::handles::Handle;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    live: Option<Live>,
}

#[derive(Debug)]
struct Live {
    spawned: u64,
    primitive: Primitive,
}

/// Store of live primitives keyed by generational entity ids.
///
/// Freed slots are reused; a stale id never resolves to the slot's new
/// occupant.
#[derive(Debug, Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_spawn: u64,
    live: usize,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, primitive: Primitive) -> EntityId {
        let spawned = self.next_spawn;
        self.next_spawn += 1;
        self.live += 1;

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.live = Some(Live { spawned, primitive });
        EntityId(Handle::new(index, slot.generation))
    }

    /// Removes the entity. Returns `false` for ids that are stale or unknown.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };
        slot.live = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(entity.index());
        self.live -= 1;
        true
    }

    pub fn get(&self, entity: EntityId) -> Option<&Primitive> {
        let slot = self.slots.get(entity.index() as usize)?;
        if slot.generation != entity.generation() {
            return None;
        }
        slot.live.as_ref().map(|l| &l.primitive)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.get(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Primitive)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let live = slot.live.as_ref()?;
            Some((
                EntityId(Handle::new(idx as u32, slot.generation)),
                &live.primitive,
            ))
        })
    }

    /// Live entities, most recently spawned first.
    pub fn topmost_first(&self) -> Vec<(EntityId, &Primitive)> {
        let mut out: Vec<(u64, EntityId, &Primitive)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let live = slot.live.as_ref()?;
                Some((
                    live.spawned,
                    EntityId(Handle::new(idx as u32, slot.generation)),
                    &live.primitive,
                ))
            })
            .collect();
        out.sort_by(|a, b| b.0.cmp(&a.0));
        out.into_iter().map(|(_, id, p)| (id, p)).collect()
    }

    pub fn count_by_kind(&self, kind: PrimitiveKind) -> usize {
        self.iter().filter(|(_, p)| p.kind() == kind).count()
    }

    fn slot_mut(&mut self, entity: EntityId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(entity.index() as usize)?;
        if slot.generation != entity.generation() || slot.live.is_none() {
            return None;
        }
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::components::{Color, PointMarker, Primitive, PrimitiveKind};
    use foundation::math::Ecef;

    fn marker(x: f64) -> Primitive {
        Primitive::Point(PointMarker {
            position: Ecef::new(x, 0.0, 0.0),
            color: Color::RED,
            pixel_size: 10.0,
        })
    }

    #[test]
    fn spawn_and_get() {
        let mut world = World::new();
        let entity = world.spawn(marker(1.0));
        assert_eq!(world.len(), 1);
        assert_eq!(world.get(entity), Some(&marker(1.0)));
        assert_eq!(world.count_by_kind(PrimitiveKind::Point), 1);
    }

    #[test]
    fn stale_id_does_not_resolve_after_reuse() {
        let mut world = World::new();
        let first = world.spawn(marker(1.0));
        assert!(world.despawn(first));
        assert!(!world.despawn(first));

        let second = world.spawn(marker(2.0));
        assert_eq!(first.index(), second.index());
        assert!(world.get(first).is_none());
        assert_eq!(world.get(second), Some(&marker(2.0)));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn topmost_first_follows_spawn_order_not_slot_order() {
        let mut world = World::new();
        let a = world.spawn(marker(1.0));
        let b = world.spawn(marker(2.0));
        world.despawn(a);
        let c = world.spawn(marker(3.0));

        let order: Vec<_> = world.topmost_first().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![c, b]);
    }
}

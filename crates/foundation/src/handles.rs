/// Generational handle: a slot index plus the generation that slot had when
/// the handle was issued. A handle to a freed slot never matches the slot's
/// next occupant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u32, u32); // (index, generation)

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }

    /// Handle for the same slot after it has been recycled.
    pub fn next_generation(&self) -> Self {
        Handle(self.0, self.1.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn recycled_slot_does_not_alias() {
        let first = Handle::new(3, 0);
        let second = first.next_generation();
        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert_eq!(second.generation(), 1);
    }
}

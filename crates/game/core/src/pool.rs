//! Reusable entity slots addressed by generational handles.
//!
//! Slots are never freed individually: `release` only flips the active flag
//! and clears per-use state, and the next `acquire` re-initializes the slot.
//! A [`Handle`] remembers the generation of the acquire that produced it, so
//! anything that outlives its entity (a scheduled shot, a stale overlap event)
//! fails to resolve instead of aliasing the slot's next occupant.

/// Entity types that can live in an [`EntityPool`].
pub trait Poolable: Default {
    fn is_active(&self) -> bool;

    /// Marks the slot inactive, zeroes its velocity and clears transient
    /// per-use state. Fields re-initialized on acquire may be left as is.
    fn release(&mut self);
}

/// Behavior when every slot is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolPolicy {
    /// `acquire` returns `None`; the request is dropped.
    Fixed,
    /// `acquire` appends a new slot.
    Growable,
}

/// Generational index into an [`EntityPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: T,
}

/// Arena of reusable entities.
#[derive(Clone, Debug)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    policy: PoolPolicy,
}

impl<T: Poolable> EntityPool<T> {
    /// Creates a pool with `capacity` pre-allocated inactive slots.
    pub fn new(capacity: usize, policy: PoolPolicy) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: T::default(),
            })
            .collect();
        Self { slots, policy }
    }

    pub fn policy(&self) -> PoolPolicy {
        self.policy
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_active()).count()
    }

    /// Claims the first inactive slot.
    ///
    /// The returned entity still holds its previous contents; the caller
    /// initializes it and marks it active. A fixed pool with no free slot
    /// returns `None`; a growable pool appends.
    pub fn acquire(&mut self) -> Option<(Handle, &mut T)> {
        match self.slots.iter().position(|s| !s.value.is_active()) {
            Some(index) => Some(self.claim(index)),
            None => match self.policy {
                PoolPolicy::Fixed => None,
                PoolPolicy::Growable => Some(self.append()),
            },
        }
    }

    /// Claims a brand-new slot at the end of the pool regardless of free
    /// slots or policy.
    pub fn append(&mut self) -> (Handle, &mut T) {
        self.slots.push(Slot {
            generation: 0,
            value: T::default(),
        });
        let index = self.slots.len() - 1;
        self.claim(index)
    }

    fn claim(&mut self, index: usize) -> (Handle, &mut T) {
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        let handle = Handle {
            index: index as u32,
            generation: slot.generation,
        };
        (handle, &mut slot.value)
    }

    /// Returns the slot to the pool. Stale or already released handles are
    /// ignored; returns whether anything was released.
    pub fn release(&mut self, handle: Handle) -> bool {
        match self.get_mut(handle) {
            Some(value) => {
                value.release();
                true
            }
            None => false,
        }
    }

    /// Resolves a handle to its active entity.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.generation == handle.generation && s.value.is_active())
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.generation == handle.generation && s.value.is_active())
            .map(|s| &mut s.value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Active entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.value.is_active())
            .map(|(i, s)| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &s.value,
                )
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.value.is_active())
            .map(|(i, s)| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.value,
                )
            })
    }

    /// Handles of all active entities, in slot order.
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// Releases every active entity.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            if slot.value.is_active() {
                slot.value.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Token {
        active: bool,
        payload: u32,
    }

    impl Poolable for Token {
        fn is_active(&self) -> bool {
            self.active
        }

        fn release(&mut self) {
            self.active = false;
            self.payload = 0;
        }
    }

    fn take(pool: &mut EntityPool<Token>, payload: u32) -> Option<Handle> {
        pool.acquire().map(|(handle, token)| {
            token.active = true;
            token.payload = payload;
            handle
        })
    }

    #[test]
    fn fixed_pool_drops_requests_when_full() {
        let mut pool = EntityPool::new(2, PoolPolicy::Fixed);
        assert!(take(&mut pool, 1).is_some());
        assert!(take(&mut pool, 2).is_some());
        assert!(take(&mut pool, 3).is_none());
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn growable_pool_appends_when_full() {
        let mut pool = EntityPool::new(1, PoolPolicy::Growable);
        take(&mut pool, 1);
        let handle = take(&mut pool, 2).unwrap();
        assert_eq!(handle.index(), 1);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn acquire_reuses_first_free_slot() {
        let mut pool = EntityPool::new(3, PoolPolicy::Fixed);
        let a = take(&mut pool, 1).unwrap();
        let _b = take(&mut pool, 2).unwrap();
        assert!(pool.release(a));

        let c = take(&mut pool, 3).unwrap();
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
    }

    #[test]
    fn stale_handle_does_not_alias_new_occupant() {
        let mut pool = EntityPool::new(1, PoolPolicy::Fixed);
        let old = take(&mut pool, 1).unwrap();
        pool.release(old);
        assert!(pool.get(old).is_none());

        let new = take(&mut pool, 2).unwrap();
        assert!(pool.get(old).is_none());
        assert!(!pool.release(old));
        assert_eq!(pool.get(new).map(|t| t.payload), Some(2));
    }

    #[test]
    fn release_clears_transient_state() {
        let mut pool = EntityPool::new(1, PoolPolicy::Fixed);
        let handle = take(&mut pool, 7).unwrap();
        pool.release(handle);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.iter().next().is_none());
    }

    #[test]
    fn append_ignores_free_slots() {
        let mut pool: EntityPool<Token> = EntityPool::new(2, PoolPolicy::Fixed);
        let (handle, token) = pool.append();
        token.active = true;
        assert_eq!(handle.index(), 2);
        assert_eq!(pool.capacity(), 3);
    }
}

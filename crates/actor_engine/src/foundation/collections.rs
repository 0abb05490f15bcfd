//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle of an actor inside its scene's arena
    pub struct ActorId;

    /// Stable handle of a scene inside the engine
    pub struct SceneId;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

/// Remove the first occurrence of `item` from an ordered list, keeping order
pub fn remove_ordered<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    if let Some(index) = list.iter().position(|x| x == item) {
        list.remove(index);
        true
    } else {
        false
    }
}

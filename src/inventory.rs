use std::collections::BTreeSet;

use crate::grid::KeyId;
use crate::types::{InventoryView, ItemKind};

/// Keys are a set; items keep pickup order with a cycling selection.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    keys: BTreeSet<KeyId>,
    items: Vec<ItemKind>,
    selected: Option<usize>,
}

impl Inventory {
    /// Keys only open doors of the area they were found in.
    pub fn drop_keys(&mut self) {
        self.keys.clear();
    }

    pub fn add_key(&mut self, key_id: KeyId) {
        self.keys.insert(key_id);
    }

    pub fn consume_key(&mut self, key_id: KeyId) -> bool {
        self.keys.remove(&key_id)
    }

    pub fn add_item(&mut self, item: ItemKind) {
        self.items.push(item);
        if self.selected.is_none() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.items
    }

    pub fn selected(&self) -> Option<ItemKind> {
        self.selected.and_then(|idx| self.items.get(idx).copied())
    }

    pub fn cycle(&mut self) {
        if self.items.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1) % self.items.len(),
            None => 0,
        });
    }

    pub fn take_selected(&mut self) -> Option<ItemKind> {
        let idx = self.selected?;
        if idx >= self.items.len() {
            self.selected = None;
            return None;
        }
        let item = self.items.remove(idx);
        self.selected = if self.items.is_empty() {
            None
        } else {
            Some(idx.min(self.items.len() - 1))
        };
        Some(item)
    }

    pub fn view(&self) -> InventoryView {
        InventoryView {
            keys: self.keys.iter().copied().collect(),
            items: self.items.clone(),
            selected: self.selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_cycles_and_survives_removal() {
        let mut inventory = Inventory::default();
        assert_eq!(inventory.take_selected(), None);

        inventory.add_item(ItemKind::Medkit);
        inventory.add_item(ItemKind::Pills);
        inventory.add_item(ItemKind::Corrupted);
        assert_eq!(inventory.selected(), Some(ItemKind::Medkit));

        inventory.cycle();
        inventory.cycle();
        assert_eq!(inventory.take_selected(), Some(ItemKind::Corrupted));
        assert_eq!(inventory.selected(), Some(ItemKind::Pills));

        inventory.cycle();
        assert_eq!(inventory.take_selected(), Some(ItemKind::Medkit));
        assert_eq!(inventory.take_selected(), Some(ItemKind::Pills));
        assert_eq!(inventory.selected(), None);
    }

    #[test]
    fn keys_are_consumed_once() {
        let mut inventory = Inventory::default();
        inventory.add_key(3);
        assert_eq!(inventory.view().keys, vec![3]);
        assert!(inventory.consume_key(3));
        assert!(!inventory.consume_key(3));
        assert!(inventory.view().keys.is_empty());
    }

    #[test]
    fn dropping_keys_keeps_items() {
        let mut inventory = Inventory::default();
        inventory.add_key(9);
        inventory.add_item(ItemKind::Pills);
        inventory.drop_keys();
        assert!(!inventory.consume_key(9));
        assert_eq!(inventory.items(), &[ItemKind::Pills]);
        assert_eq!(inventory.selected(), Some(ItemKind::Pills));
    }
}

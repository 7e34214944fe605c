use crate::domain::value_objects::EntityId;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    pub shift: bool,
    /// Ctrl または Cmd
    pub ctrl: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
    pub const SHIFT_CTRL: Self = Self {
        shift: true,
        ctrl: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    None,
    Single(EntityId),
    Multi(usize),
}

/// 表示中のビューに対する選択状態。
///
/// 選択はビュー側の関心事なので、フィルタを切り替えても保持される。
/// そのため古い ID が残りうる。描画前に `selected_in` で現在のビューと突き合わせること。
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<EntityId>,
    last_acted: Option<EntityId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, id: &EntityId, modifiers: ClickModifiers, view: &[EntityId]) {
        if modifiers.shift {
            if let Some(range) = self.range_to(id, view) {
                if !modifiers.ctrl {
                    self.selected.clear();
                }
                self.selected.extend(range.iter().cloned());
                return;
            }
            // 起点がビューに無い場合は通常クリック扱い
            self.select_only(id);
            return;
        }

        if modifiers.ctrl {
            if !self.selected.remove(id) {
                self.selected.insert(id.clone());
            }
            self.last_acted = Some(id.clone());
            return;
        }

        self.select_only(id);
    }

    /// ビュー全体が選択済みなら解除、そうでなければ全選択
    pub fn toggle_all(&mut self, view: &[EntityId]) {
        let covers_all = !view.is_empty() && view.iter().all(|id| self.selected.contains(id));
        if covers_all {
            self.selected.clear();
        } else {
            self.selected = view.iter().cloned().collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_acted = None;
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected(&self) -> &HashSet<EntityId> {
        &self.selected
    }

    pub fn last_acted(&self) -> Option<&EntityId> {
        self.last_acted.as_ref()
    }

    pub fn mode(&self) -> SelectionMode {
        match self.selected.len() {
            0 => SelectionMode::None,
            1 => self
                .selected
                .iter()
                .next()
                .cloned()
                .map_or(SelectionMode::None, SelectionMode::Single),
            n => SelectionMode::Multi(n),
        }
    }

    /// ビューに存在する選択 ID をビューの順で返す
    pub fn selected_in(&self, view: &[EntityId]) -> Vec<EntityId> {
        view.iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    /// ビューから消えた ID を選択から外す
    pub fn retain_visible(&mut self, view: &[EntityId]) {
        let visible: HashSet<&EntityId> = view.iter().collect();
        self.selected.retain(|id| visible.contains(id));
        if self
            .last_acted
            .as_ref()
            .is_some_and(|id| !visible.contains(id))
        {
            self.last_acted = None;
        }
    }

    fn select_only(&mut self, id: &EntityId) {
        self.selected.clear();
        self.selected.insert(id.clone());
        self.last_acted = Some(id.clone());
    }

    fn range_to<'v>(&self, id: &EntityId, view: &'v [EntityId]) -> Option<&'v [EntityId]> {
        let anchor = self.last_acted.as_ref()?;
        let from = view.iter().position(|v| v == anchor)?;
        let to = view.iter().position(|v| v == id)?;
        Some(&view[from.min(to)..=from.max(to)])
    }
}

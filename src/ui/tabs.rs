use super::focus::ZoneId;

/// Which chart view is shown in the tabbed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabState {
    Steps,
    Weight,
    Heart,
    /// Reserved; renders a placeholder until sleep data is available.
    Sleep,
}

impl TabState {
    pub fn all() -> &'static [TabState] {
        &[TabState::Steps, TabState::Weight, TabState::Heart, TabState::Sleep]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TabState::Steps => "Steps",
            TabState::Weight => "Weight",
            TabState::Heart => "Heart",
            TabState::Sleep => "Sleep",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TabState::Steps => 0,
            TabState::Weight => 1,
            TabState::Heart => 2,
            TabState::Sleep => 3,
        }
    }

    /// Tab at `index`, wrapping modulo the number of views.
    pub fn from_index(index: usize) -> Self {
        let all = Self::all();
        all[index % all.len()]
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        let n = Self::all().len();
        Self::from_index(self.index() + n - 1)
    }

    /// Widget shown by this tab, if any.
    pub fn zone(&self) -> Option<ZoneId> {
        match self {
            TabState::Steps => Some(ZoneId::Steps),
            TabState::Weight => Some(ZoneId::Weight),
            TabState::Heart => Some(ZoneId::Heart),
            TabState::Sleep => None,
        }
    }
}

impl Default for TabState {
    fn default() -> Self {
        TabState::Steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn four_views_in_order() {
        assert_eq!(TabState::all().len(), 4);
        for (i, tab) in TabState::all().iter().enumerate() {
            assert_eq!(tab.index(), i);
            assert_eq!(TabState::from_index(i), *tab);
        }
    }

    #[test]
    fn next_cycles_back_to_steps() {
        let mut tab = TabState::default();
        assert_eq!(tab, TabState::Steps);
        tab = tab.next();
        assert_eq!(tab, TabState::Weight);
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, TabState::Steps);
    }

    #[test]
    fn prev_wraps_to_sleep() {
        assert_eq!(TabState::Steps.prev(), TabState::Sleep);
        assert_eq!(TabState::Sleep.prev(), TabState::Heart);
    }

    #[test]
    fn zones_map_to_charts() {
        assert_eq!(TabState::Steps.zone(), Some(ZoneId::Steps));
        assert_eq!(TabState::Heart.zone(), Some(ZoneId::Heart));
        assert_eq!(TabState::Sleep.zone(), None);
    }

    fn tab_strategy() -> impl Strategy<Value = TabState> {
        (0usize..4).prop_map(TabState::from_index)
    }

    proptest! {
        #[test]
        fn next_prev_are_inverse(tab in tab_strategy()) {
            prop_assert_eq!(tab.next().prev(), tab);
            prop_assert_eq!(tab.prev().next(), tab);
        }

        #[test]
        fn any_walk_stays_in_set(start in tab_strategy(), moves in proptest::collection::vec(any::<bool>(), 0..100)) {
            let mut tab = start;
            for forward in moves {
                tab = if forward { tab.next() } else { tab.prev() };
                prop_assert!(TabState::all().contains(&tab));
            }
        }
    }
}

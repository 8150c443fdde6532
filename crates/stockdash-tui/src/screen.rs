//! Tabs of the dashboard, in display order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Overview,
    Positions,
    Activity,
}

impl ScreenId {
    /// Tab-bar order. Digit keys select by position, starting at 1.
    pub const ALL: [ScreenId; 3] = [Self::Overview, Self::Positions, Self::Activity];

    fn index(self) -> usize {
        usize::from(self.number()) - 1
    }

    /// 1-based digit shown in the tab bar.
    pub fn number(self) -> u8 {
        match self {
            Self::Overview => 1,
            Self::Positions => 2,
            Self::Activity => 3,
        }
    }

    pub fn from_number(digit: u8) -> Option<Self> {
        let slot = usize::from(digit).checked_sub(1)?;
        Self::ALL.get(slot).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Positions => "Positions",
            Self::Activity => "Activity",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

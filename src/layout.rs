//! The pure layout engine: decides how the three columns divide the screen.
//!
//! This is deliberately side-effect free — it takes the shape of a
//! workspace's columns and its layout tag and returns which arrangement
//! applies, leaving the actual pixel math to [`crate::column::Column`]'s
//! `set_width_*` family (`SPEC_FULL.md` §4.4).

/// The layout tag a [`crate::workspace::Workspace`] is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A single column, centered, full width: `central.len() == 1`.
    Full,
    /// Left and right columns split 50/50.
    Equal,
    /// Left column 65%, right column 35%.
    LeftWide,
}

/// Which concrete column arrangement a [`Workspace::reshape`] call should
/// apply, derived from the layout tag and whether `central` is occupied.
///
/// [`Workspace::reshape`]: crate::workspace::Workspace::reshape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// `central` occupies the full screen; `left`/`right` are untouched.
    CentralFull,
    /// `left` and `right` split 50/50.
    Equal,
    /// `left` takes 65%, `right` takes 35%.
    LeftWide,
}

/// `central.len() > 0` always wins regardless of `layout`
/// (`SPEC_FULL.md` §4.4): a workspace's layout tag only distinguishes
/// `Equal` from `LeftWide` once central is empty.
pub fn arrange(layout: Layout, central_occupied: bool) -> Arrangement {
    if central_occupied {
        Arrangement::CentralFull
    } else if layout == Layout::Equal {
        Arrangement::Equal
    } else {
        Arrangement::LeftWide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Layout::Full, true, Arrangement::CentralFull; "central wins over full tag")]
    #[test_case(Layout::Equal, true, Arrangement::CentralFull; "central wins over equal tag")]
    #[test_case(Layout::LeftWide, true, Arrangement::CentralFull; "central wins over leftwide tag")]
    #[test_case(Layout::Equal, false, Arrangement::Equal; "equal when central empty")]
    #[test_case(Layout::LeftWide, false, Arrangement::LeftWide; "leftwide when central empty")]
    fn arrangement(layout: Layout, central_occupied: bool, expected: Arrangement) {
        assert_eq!(arrange(layout, central_occupied), expected);
    }
}

//! Page sizes and the page-number strip shown under a grid.
//!
//! Pages are grouped in threes. Outside the last group only the current
//! group is shown; inside it the strip widens backwards by two pages so the
//! tail never shrinks to a single button.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClientError;

const GROUP_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty, PageSize::Hundred];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ClientError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(ClientError::InvalidPageSize(value))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The visible slice of page buttons, zero-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStrip {
    pub current: usize,
    pub pages: Vec<usize>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PageStrip {
    pub fn build(total_pages: usize, page_index: usize) -> Self {
        if total_pages == 0 {
            return Self {
                current: 0,
                pages: Vec::new(),
                leading_ellipsis: false,
                trailing_ellipsis: false,
                can_previous: false,
                can_next: false,
            };
        }

        let last_group_start = last_group_start(total_pages);
        let in_last_group = total_pages > GROUP_SIZE && page_index >= last_group_start;

        let pages = if total_pages <= GROUP_SIZE {
            (0..total_pages).collect()
        } else if in_last_group {
            (last_group_start.saturating_sub(2)..total_pages).collect()
        } else {
            let start = (page_index / GROUP_SIZE) * GROUP_SIZE;
            (start..(start + GROUP_SIZE).min(total_pages)).collect()
        };

        Self {
            current: page_index,
            pages,
            leading_ellipsis: page_index > 2,
            trailing_ellipsis: page_index + 1 < total_pages && total_pages > GROUP_SIZE && !in_last_group,
            can_previous: page_index > 0,
            can_next: page_index + 1 < total_pages,
        }
    }

    /// One-based labels, as printed on the buttons
    pub fn labels(&self) -> Vec<usize> {
        self.pages.iter().map(|p| p + 1).collect()
    }
}

fn last_group_start(total_pages: usize) -> usize {
    let remainder = match total_pages % GROUP_SIZE {
        0 => GROUP_SIZE,
        r => r,
    };
    total_pages.saturating_sub(remainder)
}

// src/platform/pal.rs

//! Platform abstraction layer seam.
//!
//! Resolution between FRU names and numeric ids is board-specific. The
//! [`Pal`] trait is what the SEL pipeline consumes; [`BoardPal`] is the
//! static board table for this platform.

use crate::common::{FruId, FRU_ALL, FRU_SYS};
use crate::data::datetime::now_raw_timestamp;
use crate::data::sel::{FRU_NAME_ALL, FRU_NAME_SYS};

/// Platform services the SEL pipeline depends on.
pub trait Pal {
    /// Human-readable name of a physical FRU, `None` if the id is not in
    /// the board table.
    fn fru_name(
        &self,
        id: FruId,
    ) -> Option<String>;

    /// Numeric ids selected by a FRU name, paired FRUs included.
    /// `"all"` and `"sys"` resolve to their scope sentinels.
    fn fru_ids(
        &self,
        name: &str,
    ) -> Option<Vec<FruId>>;

    /// Every physical FRU id on this board, ascending.
    fn fru_list(&self) -> Vec<FruId>;

    /// Wall-clock "now" in the raw syslog timestamp shape.
    fn now_raw(&self) -> String {
        now_raw_timestamp()
    }
}

/// One board table entry. `pair` names a FRU that shares a physical board
/// and is cleared together with this one, e.g. a riser and its mezzanine.
struct BoardFru {
    id: FruId,
    name: &'static str,
    pair: Option<FruId>,
}

const BOARD_FRUS: &[BoardFru] = &[
    BoardFru { id: 1, name: "mb", pair: None },
    BoardFru { id: 2, name: "nic", pair: None },
    BoardFru { id: 3, name: "riser", pair: Some(4) },
    BoardFru { id: 4, name: "riser-mezz", pair: Some(3) },
];

/// The static board table [`Pal`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoardPal;

impl Pal for BoardPal {
    fn fru_name(
        &self,
        id: FruId,
    ) -> Option<String> {
        BOARD_FRUS
            .iter()
            .find(|fru| fru.id == id)
            .map(|fru| fru.name.to_string())
    }

    fn fru_ids(
        &self,
        name: &str,
    ) -> Option<Vec<FruId>> {
        match name {
            FRU_NAME_ALL => return Some(vec![FRU_ALL]),
            FRU_NAME_SYS => return Some(vec![FRU_SYS]),
            _ => {}
        }
        let fru: &BoardFru = BOARD_FRUS
            .iter()
            .find(|fru| fru.name == name)?;
        let mut ids: Vec<FruId> = vec![fru.id];
        if let Some(pair) = fru.pair {
            ids.push(pair);
        }

        Some(ids)
    }

    fn fru_list(&self) -> Vec<FruId> {
        BOARD_FRUS
            .iter()
            .map(|fru| fru.id)
            .collect()
    }
}

//! Named automata as plain configuration values.

use crate::error::{Error, Result};
use crate::mask::NeighborhoodMask;
use crate::rule::Rule;

/// A mask/rule pair under a well-known name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub mask: NeighborhoodMask,
    pub rule: Rule,
}

struct PresetEntry {
    name: &'static str,
    mask: fn() -> NeighborhoodMask,
    survival: &'static [u32],
    birth: &'static [u32],
}

fn moore1() -> NeighborhoodMask {
    NeighborhoodMask::moore(1)
}

fn full11() -> NeighborhoodMask {
    NeighborhoodMask::moore(5).with_center()
}

const BUGS_SURVIVAL: [u32; 25] = {
    let mut out = [0u32; 25];
    let mut i = 0;
    while i < 25 {
        out[i] = 34 + i as u32;
        i += 1;
    }
    out
};

const BUGS_BIRTH: [u32; 12] = {
    let mut out = [0u32; 12];
    let mut i = 0;
    while i < 12 {
        out[i] = 34 + i as u32;
        i += 1;
    }
    out
};

const PRESETS: &[PresetEntry] = &[
    PresetEntry {
        name: "conway",
        mask: moore1,
        survival: &[2, 3],
        birth: &[3],
    },
    PresetEntry {
        name: "life34",
        mask: moore1,
        survival: &[3, 4],
        birth: &[3, 4],
    },
    PresetEntry {
        name: "amoeba",
        mask: moore1,
        survival: &[1, 3, 5, 8],
        birth: &[3, 5, 7],
    },
    PresetEntry {
        name: "anneal",
        mask: moore1,
        survival: &[3, 5, 6, 7, 8],
        birth: &[4, 6, 7, 8],
    },
    PresetEntry {
        name: "highlife",
        mask: moore1,
        survival: &[2, 3],
        birth: &[3, 6],
    },
    PresetEntry {
        name: "day-and-night",
        mask: moore1,
        survival: &[3, 4, 6, 7, 8],
        birth: &[3, 6, 7, 8],
    },
    PresetEntry {
        name: "bugs",
        mask: full11,
        survival: &BUGS_SURVIVAL,
        birth: &BUGS_BIRTH,
    },
];

/// Names accepted by [`preset`], in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}

/// Look up a preset by name (case-insensitive; `_` and `-` are interchangeable).
pub fn preset(name: &str) -> Result<Preset> {
    let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
    PRESETS
        .iter()
        .find(|p| p.name == wanted)
        .map(|p| Preset {
            name: p.name,
            mask: (p.mask)(),
            rule: Rule::new(p.survival.iter().copied(), p.birth.iter().copied()),
        })
        .ok_or_else(|| Error::UnknownPreset(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{names, preset};
    use crate::error::Error;
    use crate::rule::Rule;

    #[test]
    fn conway_is_b3_s23() {
        let p = preset("Conway").unwrap();
        assert_eq!(p.rule, Rule::conway());
        assert_eq!(p.mask.sum(), 8);
    }

    #[test]
    fn every_preset_rule_fits_its_mask() {
        for name in names() {
            let p = preset(name).unwrap();
            p.rule.validate(p.mask.sum()).unwrap();
        }
    }

    #[test]
    fn bugs_uses_full_eleven_square() {
        let p = preset("bugs").unwrap();
        assert_eq!((p.mask.height(), p.mask.width()), (11, 11));
        assert_eq!(p.mask.sum(), 121);
        assert_eq!(p.rule.survival().iter().next_back(), Some(&58));
        assert_eq!(p.rule.birth().iter().next_back(), Some(&45));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(preset("globe"), Err(Error::UnknownPreset(_))));
        assert!(preset("day_and_night").is_ok());
    }
}

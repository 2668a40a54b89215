//! Constant catalog and the fixed literals the engine uses.

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    pub symbol: &'static str,
    pub value: &'static str,
    pub name: &'static str,
}

const fn constant(symbol: &'static str, value: &'static str, name: &'static str) -> Constant {
    Constant { symbol, value, name }
}

/// Entries per group. Index 9 sits on the `0` key.
pub const GROUP_SIZE: usize = 10;

/// Group 1: fundamental and thermodynamic constants.
pub const GROUP1: [Constant; GROUP_SIZE] = [
    constant("c", "2.99792458E8", "Light Speed"),
    constant("h", "6.62607015E-34", "Planck h"),
    constant("hbar", "1.0545718176461563912624280033022807447E-34", "Reduced h"),
    constant("e", "1.602176634E-19", "Elem Charge"),
    constant("me", "9.1093837139E-31", "Electron m"),
    constant("k", "1.380649E-23", "Boltzmann"),
    constant("NA", "6.02214076E23", "Avogadro"),
    constant("R", "8.31446261815324", "Gas Const"),
    constant("F", "9.64853321233100184E4", "Faraday"),
    constant("g", "9.80665", "Std Gravity"),
];

/// Group 2: electromagnetic and atomic constants.
pub const GROUP2: [Constant; GROUP_SIZE] = [
    constant("mu0", "1.25663706127E-6", "Vacuum mu"),
    constant("eps0", "8.8541878188E-12", "Vacuum eps"),
    constant("Z0", "376.730313412", "Free Space Z"),
    constant("alpha", "7.2973525643E-3", "Fine Struct"),
    constant("sigma", "5.6703744191844294539709967318892308758E-8", "Stefan-Boltz"),
    constant("Rinf", "10973731.568157", "Rydberg"),
    constant("a0", "5.29177210544E-11", "Bohr Radius"),
    constant("u", "1.66053906892E-27", "Atomic Mass"),
    constant("mp", "1.67262192595E-27", "Proton m"),
    constant("eV", "1.602176634E-19", "eV->J"),
];

/// Look up `group` (1 or 2) and `index` (0..10).
pub fn lookup(group: usize, index: usize) -> Option<&'static Constant> {
    let table: &'static [Constant; GROUP_SIZE] = match group {
        1 => &GROUP1,
        2 => &GROUP2,
        _ => return None,
    };
    table.get(index)
}

/// Entries in a group; the same for every group.
#[inline]
pub fn group_size(_group: usize) -> usize {
    GROUP_SIZE
}

pub fn symbol(group: usize, index: usize) -> Option<&'static str> {
    lookup(group, index).map(|c| c.symbol)
}

pub fn name(group: usize, index: usize) -> Option<&'static str> {
    lookup(group, index).map(|c| c.name)
}

pub const PI: &str = "3.1415926535897932384626433832795028842";
pub const E: &str = "2.7182818284590452353602874713526624978";

/// Angle conversion factors.
pub const DEG_TO_RAD: &str = "0.017453292519943295769236907684886127134";
pub const RAD_TO_DEG: &str = "57.295779513082320876798154814105170332";
pub const GRAD_TO_RAD: &str = "0.015707963267948966192313216916397514421";
pub const RAD_TO_GRAD: &str = "63.661977236758134307553505349005744814";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Dec128, Decimal, Flags};

    #[test]
    fn test_lookup() {
        assert_eq!(symbol(1, 0), Some("c"));
        assert_eq!(name(2, 9), Some("eV->J"));
        assert!(lookup(0, 0).is_none());
        assert!(lookup(3, 0).is_none());
        assert!(lookup(1, 10).is_none());
        assert_eq!(group_size(2), 10);
    }

    #[test]
    fn test_every_literal_parses() {
        let mut flags = Flags::NONE;
        for c in GROUP1.iter().chain(GROUP2.iter()) {
            let v = Dec128::parse(c.value, &mut flags);
            assert!(v.is_some_and(|v| !v.is_special()), "{}", c.symbol);
        }
        for text in [PI, E, DEG_TO_RAD, RAD_TO_DEG, GRAD_TO_RAD, RAD_TO_GRAD] {
            assert!(Dec128::parse(text, &mut flags).is_some());
        }
    }
}

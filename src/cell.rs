use std::fmt::{Display, Formatter};

use crate::shape::Step;

/// What occupies a single cell of a trail map.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Terrain {
    /// Open ground, `.`
    Floor,
    /// Forest, `#`. Also returned for any location off the board.
    #[default]
    Wall,
    /// Steep ice, `^ v < >`, which in [`Mode::Slippery`] may only be left in the direction it points.
    Slope(Step),
}

impl Terrain {
    /// Whether a hiker may stand here at all.
    pub fn is_open(&self) -> bool {
        !matches!(self, Terrain::Wall)
    }

    pub(crate) fn slope(&self) -> Option<Step> {
        match self {
            Terrain::Slope(dir) => Some(*dir),
            _ => None,
        }
    }
}

impl TryFrom<char> for Terrain {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            '.' => Terrain::Floor,
            '#' => Terrain::Wall,
            '^' => Terrain::Slope(Step::Up),
            'v' => Terrain::Slope(Step::Down),
            '<' => Terrain::Slope(Step::Left),
            '>' => Terrain::Slope(Step::Right),
            other => return Err(other),
        })
    }
}

impl From<Terrain> for char {
    fn from(value: Terrain) -> Self {
        match value {
            Terrain::Floor => '.',
            Terrain::Wall => '#',
            Terrain::Slope(Step::Up) => '^',
            Terrain::Slope(Step::Down) => 'v',
            Terrain::Slope(Step::Left) => '<',
            Terrain::Slope(Step::Right) => '>',
        }
    }
}

impl Display for Terrain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// Whether slopes restrict movement.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Slopes may only be left downhill, and never climbed.
    #[default]
    Slippery,
    /// Slopes behave like open floor.
    Dry,
}

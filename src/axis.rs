//! Axis directions of a coordinate system.

use std::fmt;

/// Direction of positive increments along a coordinate system axis.
///
/// The sixteen compass directions are declared clockwise from north, so that
/// the opposite of compass direction `i` is `(i + 8) mod 16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
    South,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
    Up,
    Down,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    Future,
    Past,
    ColumnPositive,
    ColumnNegative,
    RowPositive,
    RowNegative,
    DisplayRight,
    DisplayLeft,
    DisplayUp,
    DisplayDown,
    Other,
}

const COMPASS: [AxisDirection; 16] = [
    AxisDirection::North,
    AxisDirection::NorthNorthEast,
    AxisDirection::NorthEast,
    AxisDirection::EastNorthEast,
    AxisDirection::East,
    AxisDirection::EastSouthEast,
    AxisDirection::SouthEast,
    AxisDirection::SouthSouthEast,
    AxisDirection::South,
    AxisDirection::SouthSouthWest,
    AxisDirection::SouthWest,
    AxisDirection::WestSouthWest,
    AxisDirection::West,
    AxisDirection::WestNorthWest,
    AxisDirection::NorthWest,
    AxisDirection::NorthNorthWest,
];

impl AxisDirection {
    fn compass_index(self) -> Option<usize> {
        COMPASS.iter().position(|&d| d == self)
    }

    /// The direction pointing the other way, or `self` if there is none
    /// (geocentric axes and [`AxisDirection::Other`]).
    pub fn opposite(self) -> Self {
        use AxisDirection::*;
        if let Some(i) = self.compass_index() {
            return COMPASS[(i + 8) % 16];
        }
        match self {
            Up => Down,
            Down => Up,
            Future => Past,
            Past => Future,
            ColumnPositive => ColumnNegative,
            ColumnNegative => ColumnPositive,
            RowPositive => RowNegative,
            RowNegative => RowPositive,
            DisplayRight => DisplayLeft,
            DisplayLeft => DisplayRight,
            DisplayUp => DisplayDown,
            DisplayDown => DisplayUp,
            other => other,
        }
    }

    /// The "positive" member of the pair made of this direction and its opposite.
    ///
    /// North for south, east for west, up for down, future for past, etc.
    /// Two directions are colinear if and only if they have the same absolute direction.
    pub fn absolute(self) -> Self {
        use AxisDirection::*;
        if let Some(i) = self.compass_index() {
            return COMPASS[i % 8];
        }
        match self {
            Down => Up,
            Past => Future,
            ColumnNegative => ColumnPositive,
            RowNegative => RowPositive,
            DisplayLeft => DisplayRight,
            DisplayDown => DisplayUp,
            other => other,
        }
    }

    /// `true` if this is one of the sixteen compass directions.
    pub fn is_compass(self) -> bool {
        self.compass_index().is_some()
    }

    /// Identifier as used in the ISO 19111 code list.
    pub fn identifier(self) -> &'static str {
        use AxisDirection::*;
        match self {
            North => "north",
            NorthNorthEast => "northNorthEast",
            NorthEast => "northEast",
            EastNorthEast => "eastNorthEast",
            East => "east",
            EastSouthEast => "eastSouthEast",
            SouthEast => "southEast",
            SouthSouthEast => "southSouthEast",
            South => "south",
            SouthSouthWest => "southSouthWest",
            SouthWest => "southWest",
            WestSouthWest => "westSouthWest",
            West => "west",
            WestNorthWest => "westNorthWest",
            NorthWest => "northWest",
            NorthNorthWest => "northNorthWest",
            Up => "up",
            Down => "down",
            GeocentricX => "geocentricX",
            GeocentricY => "geocentricY",
            GeocentricZ => "geocentricZ",
            Future => "future",
            Past => "past",
            ColumnPositive => "columnPositive",
            ColumnNegative => "columnNegative",
            RowPositive => "rowPositive",
            RowNegative => "rowNegative",
            DisplayRight => "displayRight",
            DisplayLeft => "displayLeft",
            DisplayUp => "displayUp",
            DisplayDown => "displayDown",
            Other => "other",
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::AxisDirection::*;

    #[test]
    fn test_absolute() {
        assert_eq!(South.absolute(), North);
        assert_eq!(West.absolute(), East);
        assert_eq!(NorthWest.absolute(), SouthEast);
        assert_eq!(SouthEast.absolute(), SouthEast);
        assert_eq!(Down.absolute(), Up);
        assert_eq!(Past.absolute(), Future);
        assert_eq!(DisplayDown.absolute(), DisplayUp);
        assert_eq!(GeocentricY.absolute(), GeocentricY);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(North.opposite(), South);
        assert_eq!(EastNorthEast.opposite(), WestSouthWest);
        assert_eq!(RowPositive.opposite(), RowNegative);
        assert_eq!(Other.opposite(), Other);
        assert!(!Up.is_compass());
    }

    #[test]
    fn test_colinear_iff_same_absolute() {
        for d in [North, NorthEast, Up, ColumnPositive, DisplayLeft] {
            assert_eq!(d.absolute(), d.opposite().absolute());
        }
        assert_ne!(North.absolute(), East.absolute());
    }
}

use serde::{Deserialize, Serialize};

/// GTFS direction_id of a trip, when the feed provides one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    Zero,
    One,
}

/// direction bucket used when aggregating service. trips without direction data
/// are attributed to [`DirectionKey::Combined`] instead of being forced into
/// one of the two travel directions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKey {
    Zero,
    One,
    Combined,
}

impl From<TravelDirection> for DirectionKey {
    fn from(value: TravelDirection) -> Self {
        match value {
            TravelDirection::Zero => DirectionKey::Zero,
            TravelDirection::One => DirectionKey::One,
        }
    }
}

impl From<Option<TravelDirection>> for DirectionKey {
    fn from(value: Option<TravelDirection>) -> Self {
        value.map(DirectionKey::from).unwrap_or(DirectionKey::Combined)
    }
}

impl TravelDirection {
    /// reads a raw GTFS direction_id value. anything other than 0 or 1 is treated as missing.
    pub fn from_direction_id(direction_id: Option<u8>) -> Option<TravelDirection> {
        match direction_id {
            Some(0) => Some(TravelDirection::Zero),
            Some(1) => Some(TravelDirection::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for DirectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DirectionKey::Zero => "0",
            DirectionKey::One => "1",
            DirectionKey::Combined => "combined",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::{DirectionKey, TravelDirection};

    #[test]
    fn test_missing_direction_is_combined() {
        assert_eq!(DirectionKey::from(None), DirectionKey::Combined);
        assert_eq!(
            DirectionKey::from(Some(TravelDirection::One)),
            DirectionKey::One
        );
        assert_eq!(TravelDirection::from_direction_id(Some(7)), None);
    }
}

//! Display model for gallery entries, independent of any terminal widgets.

use crate::protocol::Zone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Image(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCard {
    pub id: String,
    pub title: String,
    pub thumbnail: Thumbnail,
    /// Secondary line, present only for zones that have been played.
    pub plays: Option<String>,
}

impl ZoneCard {
    pub fn from_zone(zone: &Zone) -> Self {
        let thumbnail = match zone.image.as_deref() {
            Some(img) if !img.trim().is_empty() => Thumbnail::Image(img.to_string()),
            _ => Thumbnail::Placeholder,
        };
        let plays = (zone.popularity > 0)
            .then(|| format!("{} plays", group_thousands(zone.popularity)));
        Self {
            id: zone.id.clone(),
            title: zone.name.clone(),
            thumbnail,
            plays,
        }
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(100000), "100,000");
    }

    #[test]
    fn unplayed_zone_has_no_plays_line() {
        let zone = Zone {
            id: "7".into(),
            name: "Quiet".into(),
            ..Zone::default()
        };
        let card = ZoneCard::from_zone(&zone);
        assert_eq!(card.plays, None);
        assert_eq!(card.thumbnail, Thumbnail::Placeholder);
    }

    #[test]
    fn played_zone_shows_grouped_count_and_image() {
        let zone = Zone {
            id: "8".into(),
            name: "Busy".into(),
            image: Some("https://img/8.png".into()),
            popularity: 25_300,
            ..Zone::default()
        };
        let card = ZoneCard::from_zone(&zone);
        assert_eq!(card.plays.as_deref(), Some("25,300 plays"));
        assert_eq!(card.thumbnail, Thumbnail::Image("https://img/8.png".into()));
    }
}

pub mod items;
pub mod monsters;

use bracket_random::prelude::RandomNumberGenerator;

/// Named colours used by the simulation's messages and entities.
pub mod palette {
    pub type Rgb8 = (u8, u8, u8);

    pub const WHITE: Rgb8 = (255, 255, 255);
    pub const RED: Rgb8 = (255, 0, 0);
    pub const DARK_RED: Rgb8 = (191, 0, 0);
    pub const ORANGE: Rgb8 = (255, 127, 0);
    pub const YELLOW: Rgb8 = (255, 255, 0);
    pub const LIGHT_YELLOW: Rgb8 = (255, 255, 115);
    pub const GREEN: Rgb8 = (0, 255, 0);
    pub const LIGHT_GREEN: Rgb8 = (115, 255, 115);
    pub const DESATURATED_GREEN: Rgb8 = (63, 127, 63);
    pub const DARKER_GREEN: Rgb8 = (0, 127, 0);
    pub const LIGHT_BLUE: Rgb8 = (115, 185, 255);
    pub const LIGHT_CYAN: Rgb8 = (115, 255, 255);
    pub const VIOLET: Rgb8 = (127, 0, 255);
    pub const LIGHT_VIOLET: Rgb8 = (185, 115, 255);
}

/// Serde adapter storing an `RGB` as an `[r, g, b]` float triple.
pub mod rgb_serde {
    use bracket_terminal::prelude::RGB;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &RGB, serializer: S) -> Result<S::Ok, S::Error> {
        [color.r, color.g, color.b].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RGB, D::Error> {
        let [r, g, b] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(RGB::from_f32(r, g, b))
    }
}

/// A weighted table rolled as cumulative bands: an entry with weight `w`
/// owns `w` consecutive values of `0..total`.
#[derive(Clone, Debug)]
pub struct SpawnTable<T> {
    entries: Vec<(u32, T)>,
    total: u32,
}

impl<T> SpawnTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
        }
    }

    pub fn add(mut self, weight: u32, entry: T) -> Self {
        if weight > 0 {
            self.total += weight;
            self.entries.push((weight, entry));
        }
        self
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Maps a roll in `0..total` to its band.
    pub fn pick(&self, roll: u32) -> Option<&T> {
        let mut ceiling = 0;
        for (weight, entry) in &self.entries {
            ceiling += weight;
            if roll < ceiling {
                return Some(entry);
            }
        }
        None
    }

    pub fn roll(&self, rng: &mut RandomNumberGenerator) -> Option<&T> {
        if self.total == 0 {
            return None;
        }
        let roll = rng.range(0, self.total);
        self.pick(roll)
    }
}

impl<T> Default for SpawnTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_cumulative() {
        let table = SpawnTable::new().add(70, 'h').add(10, 'l').add(10, 'f').add(10, 'c');
        assert_eq!(table.total(), 100);
        assert_eq!(table.pick(0), Some(&'h'));
        assert_eq!(table.pick(69), Some(&'h'));
        assert_eq!(table.pick(70), Some(&'l'));
        assert_eq!(table.pick(89), Some(&'f'));
        assert_eq!(table.pick(99), Some(&'c'));
        assert_eq!(table.pick(100), None);
    }

    #[test]
    fn zero_weight_entries_never_roll() {
        let table = SpawnTable::new().add(0, "troll").add(5, "orc");
        let mut rng = RandomNumberGenerator::seeded(7);
        for _ in 0..50 {
            assert_eq!(table.roll(&mut rng), Some(&"orc"));
        }
        let empty: SpawnTable<u8> = SpawnTable::new();
        assert_eq!(empty.roll(&mut rng), None);
    }
}
